//! Call-site macros accepting arguments of mixed types.
//!
//! ```
//! let provider = logbus::Provider::default();
//! let log = provider.create_logger(Some("Main"));
//! logbus::info!(log, "listening on port", 8080);
//! logbus::error!(log, logbus::Failure::new("bind failed"));
//! ```

/// Log at an explicit level.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr $(, $arg:expr)* $(,)?) => {{
        let args: ::std::vec::Vec<$crate::LogArg> =
            ::std::vec![$($crate::LogArg::from($arg)),*];
        $logger.log(&$level, args)
    }};
}

#[macro_export]
macro_rules! error {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::ERROR $(, $arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::WARN $(, $arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::INFO $(, $arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::DEBUG $(, $arg)*)
    };
}

#[macro_export]
macro_rules! verbose {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::VERBOSE $(, $arg)*)
    };
}

#[cfg(test)]
mod tests {
    use crate::event::LoggerEvent;
    use crate::{Failure, LogLevel, Provider};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_mixed_arguments() {
        let provider = Provider::default();
        let logger = provider.create_logger(None);
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        logger.subscribe(Arc::new(move |event: &LoggerEvent| {
            let LoggerEvent::Log(record) = event;
            sink.lock().unwrap().push(record.messages.join(" "));
        }));

        crate::info!(logger, "port", 8080, true);
        crate::error!(logger, Failure::new("boom"));
        crate::log!(logger, LogLevel::WARN);

        assert_eq!(*lines.lock().unwrap(), ["port 8080 true", "boom ", ""]);
    }
}
