//! # Catalog Unit Tests / 目录单元测试
//!
//! Loading catalogs and expanding them into experiment descriptors.
//!
//! 加载目录并将其展开为实验描述符。

use std::path::PathBuf;

use sweep_runner::config::{
    Catalog, EngineSettings, InterruptPolicy, SettingsOverrides, parse_catalog,
};
use sweep_runner::core::error::ConfigError;
use sweep_runner::descriptor::build_descriptors;
use sweep_runner::parser::LogParser;

#[cfg(test)]
mod catalog_tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_empty_catalog() {
        let catalog = parse_catalog("").unwrap();
        assert_eq!(catalog, Catalog::default());
        assert_eq!(catalog.timeout, 1200);
        assert_eq!(catalog.on_interrupt, InterruptPolicy::Rename);
        assert!(build_descriptors(&catalog).unwrap().is_empty());
    }

    #[test]
    fn test_engine_settings_from_catalog() {
        let catalog = parse_catalog(
            r#"
outdir = "/tmp/sweep-out"
timeout = 90
settle_secs = 0.5
on_interrupt = "discard"
"#,
        )
        .unwrap();
        let settings = EngineSettings::from_catalog(&catalog).unwrap();
        assert_eq!(settings.outdir.to_str(), Some("/tmp/sweep-out"));
        assert_eq!(settings.timeout_secs, 90);
        assert_eq!(settings.settle_delay.as_millis(), 500);
        assert_eq!(settings.on_interrupt, InterruptPolicy::Discard);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let catalog = parse_catalog("timeout = 0").unwrap();
        assert!(EngineSettings::from_catalog(&catalog).is_err());
        assert_eq!(
            EngineSettings::new("out", 0).unwrap_err(),
            ConfigError::ZeroTimeout
        );
    }

    #[test]
    fn test_command_line_overrides_apply_before_validation() {
        let catalog = parse_catalog("timeout = 0\nsettle_secs = 1.5").unwrap();
        let overrides = SettingsOverrides {
            outdir: Some(PathBuf::from("elsewhere")),
            timeout: Some(60),
            settle_secs: Some(0.0),
        };
        let settings = EngineSettings::resolve(&catalog, &overrides).unwrap();
        assert_eq!(settings.timeout_secs, 60);
        assert_eq!(settings.outdir, PathBuf::from("elsewhere"));
        assert!(settings.settle_delay.is_zero());

        let bad_settle = SettingsOverrides {
            settle_secs: Some(-2.0),
            ..Default::default()
        };
        assert!(EngineSettings::resolve(&parse_catalog("").unwrap(), &bad_settle).is_err());
    }

    #[test]
    fn test_invalid_settle_is_rejected_at_load() {
        for content in ["settle_secs = -1.0", "settle_secs = nan", "settle_secs = inf"] {
            let err = parse_catalog(content).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::InvalidSettle(_))),
                "{content} should be rejected"
            );
        }
        assert!(parse_catalog("settle_secs = 0.0").is_ok());
    }

    #[test]
    fn test_names_used_in_report_files_are_checked() {
        let family = |name: &str, metrics: &str| {
            format!("[[families]]\nname = \"{name}\"\nmetrics = {metrics}\n")
        };
        assert!(parse_catalog(&family("lts", r#"["time", "tquot"]"#)).is_ok());
        for content in [
            family("../lts", r#"["time"]"#),
            family("", r#"["time"]"#),
            family("lts", r#"["a/b"]"#),
        ] {
            let err = parse_catalog(&content).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ConfigError>(),
                Some(ConfigError::InvalidFileStem(_))
            ));
        }
    }

    #[test]
    fn test_language_defaults_to_unset() {
        assert_eq!(parse_catalog("").unwrap().language, None);
        assert_eq!(
            parse_catalog("language = \"zh-CN\"").unwrap().language.as_deref(),
            Some("zh-CN")
        );
    }

    #[test]
    fn test_unknown_parser_fails_to_load() {
        let content = r#"
[[families]]
name = "lts"
[[families.variants]]
name = "{model}-x"
command = "x"
parser = "nope"
"#;
        assert!(parse_catalog(content).is_err());
    }
}

#[cfg(test)]
mod expansion_tests {
    use super::*;

    const TWO_VARIANTS: &str = r#"
[[families]]
name = "ctmc"

[[families.models]]
name = "cycling_4"
input = ["models/cycling_4.bdd", "--ctmc"]

[[families.models]]
name = "polling_12"
input = ["models/polling_12.bdd"]

[[families.variants]]
name = "{model}-fr-{workers}"
command = "./sigrefmc {input} -w {workers} -l fr"
parser = "mc"
workers = [1, 8]

[[families.variants]]
name = "{model}-gmp"
command = "./sigref_gmp {input}"
parser = "gmp"
label = "exact"
exclude = ["polling_12"]
"#;

    #[test]
    fn test_expansion_order_and_invocations() {
        let catalog = parse_catalog(TWO_VARIANTS).unwrap();
        let descriptors = build_descriptors(&catalog).unwrap();
        let names: Vec<_> = descriptors.iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            [
                "cycling_4-fr-1",
                "polling_12-fr-1",
                "cycling_4-fr-8",
                "polling_12-fr-8",
                "cycling_4-gmp",
            ]
        );

        let first = &descriptors[0];
        assert_eq!(first.program(), "./sigrefmc");
        assert_eq!(
            first.args(),
            ["models/cycling_4.bdd", "--ctmc", "-w", "1", "-l", "fr"]
        );
        assert_eq!(first.parser(), LogParser::Mc);

        let origin = descriptors[4].origin().unwrap();
        assert_eq!(origin.family, "ctmc");
        assert_eq!(origin.model, "cycling_4");
        assert_eq!(origin.column, "exact");
        assert_eq!(descriptors[2].origin().unwrap().column, "fr-8");
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let content = r#"
[[families]]
name = "a"
[[families.models]]
name = "m"
[[families.variants]]
name = "{model}-x"
command = "x"
parser = "rw"

[[families]]
name = "b"
[[families.models]]
name = "m"
[[families.variants]]
name = "{model}-x"
command = "y"
parser = "rw"
"#;
        let catalog = parse_catalog(content).unwrap();
        assert_eq!(
            build_descriptors(&catalog).unwrap_err(),
            ConfigError::DuplicateName("m-x".to_string())
        );
    }

    #[test]
    fn test_workers_placeholder_requires_worker_list() {
        let content = r#"
[[families]]
name = "a"
[[families.models]]
name = "m"
[[families.variants]]
name = "{model}-x-{workers}"
command = "x -w {workers}"
parser = "mc"
"#;
        let catalog = parse_catalog(content).unwrap();
        assert!(matches!(
            build_descriptors(&catalog),
            Err(ConfigError::MissingWorkers { .. })
        ));
    }

    #[test]
    fn test_unknown_placeholder_is_rejected() {
        let content = r#"
[[families]]
name = "a"
[[families.models]]
name = "m"
[[families.variants]]
name = "{model}-x"
command = "x {threads}"
parser = "mc"
"#;
        let catalog = parse_catalog(content).unwrap();
        assert!(matches!(
            build_descriptors(&catalog),
            Err(ConfigError::UnknownPlaceholder { .. })
        ));
    }

    #[test]
    fn test_speedup_must_reference_known_experiments() {
        let content = r#"
[[families]]
name = "a"
[[families.models]]
name = "m"
[[families.variants]]
name = "{model}-x"
command = "x"
parser = "mc"
[[families.speedups]]
label = "S"
numerator = "{model}-x"
denominator = "{model}-y"
"#;
        let catalog = parse_catalog(content).unwrap();
        assert!(matches!(
            build_descriptors(&catalog),
            Err(ConfigError::UnknownSpeedupReference { .. })
        ));
    }
}
