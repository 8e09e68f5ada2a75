use crate::settings::{Settings, SettingsError};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber.  `RUST_LOG` wins over the configured level.
pub fn init(settings: &Settings) -> Result<(), SettingsError> {
    let level = settings.log_level()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| SettingsError::Logging(e.to_string()))?;

    info!(elasticsearch_url = %settings.elasticsearch_url, "logging initialized");
    Ok(())
}

#[cfg(test)]
pub fn init_for_tests() {
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env().add_directive(
            "es_adapters=debug"
                .parse()
                .expect("valid logging directive"),
        );

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

#[cfg(test)]
mod tests {
    use crate::logging::{init, init_for_tests};
    use crate::settings::{Settings, SettingsError};

    #[test]
    fn test_second_init_fails() {
        init_for_tests();
        init_for_tests();

        // a global subscriber is already installed
        let err = init(&Settings::default()).unwrap_err();
        assert!(matches!(err, SettingsError::Logging(_)));
    }

    #[test]
    fn test_invalid_level_is_rejected_before_install() {
        let settings = Settings {
            log_level: "loud".into(),
            ..Settings::default()
        };
        assert!(matches!(
            init(&settings).unwrap_err(),
            SettingsError::LogLevel(_)
        ));
    }
}
