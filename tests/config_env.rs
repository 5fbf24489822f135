use mini_ioc::config::{ENV_DUPLICATE_POLICY, ENV_MAX_DEPTH};
use mini_ioc::{BeanClass, ConfigError, Container, ContainerConfig, DiError, DuplicatePolicy, Injectable};
use serial_test::serial;
use std::env;

fn clear_env() {
    env::remove_var(ENV_MAX_DEPTH);
    env::remove_var(ENV_DUPLICATE_POLICY);
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();

    let config = ContainerConfig::from_env().unwrap();
    assert_eq!(config, ContainerConfig::default());
    assert_eq!(config.max_depth, 1024);
    assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    env::set_var(ENV_MAX_DEPTH, " 32 ");
    env::set_var(ENV_DUPLICATE_POLICY, "REJECT");

    let config = ContainerConfig::from_env().unwrap();
    assert_eq!(config.max_depth, 32);
    assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);

    clear_env();
}

#[test]
#[serial]
fn test_from_env_rejects_malformed_values() {
    clear_env();

    env::set_var(ENV_MAX_DEPTH, "deep");
    match ContainerConfig::from_env() {
        Err(ConfigError::InvalidValue { key, value }) => {
            assert_eq!(key, ENV_MAX_DEPTH);
            assert_eq!(value, "deep");
        }
        other => panic!("Expected InvalidValue error, got {:?}", other),
    }

    env::set_var(ENV_MAX_DEPTH, "0");
    assert!(ContainerConfig::from_env().is_err());

    env::remove_var(ENV_MAX_DEPTH);
    env::set_var(ENV_DUPLICATE_POLICY, "merge");
    let error = ContainerConfig::from_env().unwrap_err();
    assert!(error.to_string().contains(ENV_DUPLICATE_POLICY));

    clear_env();
}

#[test]
#[serial]
fn test_env_config_drives_container() {
    struct Clock;
    impl Injectable for Clock {
        fn bean_class() -> BeanClass {
            BeanClass::concrete::<Self>().constructor(|| Clock).build()
        }
    }

    clear_env();
    env::set_var(ENV_DUPLICATE_POLICY, "reject");

    let container = Container::with_config(ContainerConfig::from_env().unwrap());
    assert_eq!(container.config().duplicate_policy, DuplicatePolicy::Reject);

    container.register::<Clock>().unwrap();
    assert!(matches!(
        container.register::<Clock>(),
        Err(DiError::DuplicateDefinition(_))
    ));

    clear_env();
}

#[cfg(feature = "config")]
#[test]
fn test_from_json_str() {
    let config = ContainerConfig::from_json_str(r#"{ "max_depth": 8, "duplicate_policy": "reject" }"#).unwrap();
    assert_eq!(config.max_depth, 8);
    assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);

    let partial = ContainerConfig::from_json_str("{}").unwrap();
    assert_eq!(partial, ContainerConfig::default());

    assert!(matches!(
        ContainerConfig::from_json_str(r#"{ "duplicate_policy": "merge" }"#),
        Err(ConfigError::Parse(_))
    ));

    match ContainerConfig::from_json_str(r#"{ "max_depth": 0 }"#) {
        Err(ConfigError::InvalidValue { key, value }) => {
            assert_eq!(key, "max_depth");
            assert_eq!(value, "0");
        }
        other => panic!("Expected InvalidValue error, got {:?}", other),
    }

    let round_trip = serde_json::to_string(&config).unwrap();
    assert!(round_trip.contains("\"reject\""));
}

#[test]
fn test_zero_depth_still_builds_beans() {
    struct Clock;
    impl Injectable for Clock {
        fn bean_class() -> BeanClass {
            BeanClass::concrete::<Self>().constructor(|| Clock).build()
        }
    }

    let built = Container::with_config(ContainerConfig::default().with_max_depth(0));
    assert_eq!(built.config().max_depth, 1);
    built.register::<Clock>().unwrap();
    assert!(built.get_bean::<Clock>().is_ok());

    // Field set directly, bypassing the builder
    let mut config = ContainerConfig::default();
    config.max_depth = 0;
    let direct = Container::with_config(config);
    assert_eq!(direct.config().max_depth, 1);
    direct.register::<Clock>().unwrap();
    assert!(direct.get_bean::<Clock>().is_ok());
}
