mod settings;

pub use settings::{ArchiverConfig, EncryptionConfig, LoggingConfig, Settings, ENCRYPTION_KEY_VAR};
