use crate::ports::LoggerPort;

/// Native logger implementation using stdout/stderr.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger;

impl ConsoleLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerPort for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("[LOG] {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("[ERROR] {message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("[WARN] {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let logger = ConsoleLogger::new();
        logger.log("test");
    }

    #[test]
    fn test_logger_all_methods() {
        let logger = ConsoleLogger::new();
        logger.log("test log");
        logger.warn("test warn");
        logger.error("test error");
    }
}
