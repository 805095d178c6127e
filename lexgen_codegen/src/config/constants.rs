pub mod compile_time {
    pub mod render {
        /// Maximum size of one rendered output unit (4MB).
        /// A unit larger than this aborts the render instead of writing.
        pub const MAX_UNIT_SIZE: usize = 4 * 1024 * 1024;

        /// Maximum length of a placeholder name in a template.
        pub const MAX_PLACEHOLDER_LENGTH: usize = 64;

        /// Maximum length of a generated identifier before numeric
        /// suffixing truncates and disambiguates it.
        pub const MAX_IDENTIFIER_LENGTH: usize = 255;
    }

    pub mod emitted {
        /// Token buffer bound compiled into generated scanners. Matches
        /// the reference runtime's bound so backends agree on oversized
        /// input behavior.
        pub const MAX_TOKEN_LENGTH: usize = 4096;
    }

    pub mod logging {
        /// Maximum events retained by the in-memory logger.
        pub const MAX_LOG_EVENTS: usize = 10_000;

        /// Maximum log message length before truncation.
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;
    }
}
