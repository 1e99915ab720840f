//! Process-wide default provider.
//!
//! Libraries should take a `&Provider`; applications install one default at
//! startup so convenience calls and third-party code share it.

use std::sync::OnceLock;

use crate::error::GlobalError;
use crate::logger::Logger;
use crate::provider::Provider;

static DEFAULT: OnceLock<Provider> = OnceLock::new();

/// Install `provider` as the default. Fails if one is already in place.
pub fn install(provider: Provider) -> Result<(), GlobalError> {
    DEFAULT.set(provider).map_err(|_| GlobalError::AlreadyInstalled)
}

/// The default provider, created with default options on first use.
pub fn provider() -> &'static Provider {
    DEFAULT.get_or_init(Provider::default)
}

/// Create a logger on the default provider.
pub fn create_logger(channel: Option<&str>) -> Logger {
    provider().create_logger(channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_shared() {
        let a = create_logger(Some("A"));
        let b = create_logger(Some("B"));
        assert_eq!(a.provider_id(), b.provider_id());
        assert_eq!(a.provider_id(), provider().id());

        assert!(matches!(install(Provider::default()), Err(GlobalError::AlreadyInstalled)));
    }
}
