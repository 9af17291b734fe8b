// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::wasm::capability_manager::create_engine;
use crate::backends::wasm::module::InstanceSettings;
use crate::backends::wasm::GuestModuleFactory;
use crate::config::Config;
use crate::engine::factory::ExecutorFactory;
use crate::errors::ModuleMapError;
use crate::traits::{PipelineExecutor, Stage, Stages};
use std::sync::Arc;

/// Pipeline runtime builder - compiles the configured modules and picks the
/// executor for the configured strategy.
///
/// All modules share one engine and one set of instance settings. Modules
/// are compiled here, once; each call later instantiates a fresh copy.
///
/// # Examples
///
/// ```no_run
/// use wasm_relay::config::{load_and_validate_config, RuntimeBuilder};
///
/// let config = load_and_validate_config("configs/greetings.yaml").unwrap();
/// let (stages, executor) = RuntimeBuilder::from_config(&config).unwrap();
///
/// assert_eq!(executor.strategy_name(), "routed");
/// assert_eq!(stages.len(), 3);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the ordered stage list and the executor from configuration.
    pub fn from_config(
        cfg: &Config,
    ) -> Result<(Stages, Box<dyn PipelineExecutor>), ModuleMapError> {
        let stages = Self::build_stages(cfg)?;
        let executor = ExecutorFactory::from_config(cfg);
        Ok((stages, executor))
    }

    /// Instance settings derived from the `allocator` and `wasm` sections.
    pub fn instance_settings(cfg: &Config) -> InstanceSettings {
        InstanceSettings {
            fuel: cfg.wasm.fuel.resolved(),
            allocator: cfg.allocator.clone(),
            max_payload_bytes: cfg.wasm.get_max_payload_bytes(),
            wasi: cfg.wasm.wasi.clone(),
        }
    }

    fn build_stages(cfg: &Config) -> Result<Stages, ModuleMapError> {
        let engine =
            create_engine().map_err(|source| ModuleMapError::EngineCreationFailed { source })?;
        let settings = Arc::new(Self::instance_settings(cfg));

        let mut stages = Stages::new();
        for module in &cfg.modules {
            let invoker = GuestModuleFactory::create_module(
                module,
                &cfg.base_dir,
                &engine,
                settings.clone(),
            )
            .map_err(|source| ModuleMapError::ModuleCreationFailed {
                module_id: module.id.clone(),
                path: module.module.clone(),
                source,
            })?;
            stages.push(Stage::new(invoker, cfg.entry_point_for(module)));
        }
        Ok(stages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FuelConfig, ModuleConfig, Strategy};
    use tempfile::TempDir;

    #[test]
    fn test_instance_settings_clamp_fuel() {
        let mut cfg = Config::default();
        cfg.wasm.fuel = FuelConfig {
            default: Some(2_000_000_000),
            minimum: None,
            maximum: None,
        };
        cfg.wasm.max_payload_bytes = Some(512);

        let settings = RuntimeBuilder::instance_settings(&cfg);
        assert_eq!(settings.fuel, 500_000_000);
        assert_eq!(settings.max_payload_bytes, 512);
        assert_eq!(settings.allocator.allocate, "malloc");
    }

    #[test]
    fn test_missing_module_names_the_module() {
        let cfg = Config {
            strategy: Strategy::FanOut,
            entry_point: "act".to_string(),
            modules: vec![ModuleConfig {
                id: "ghost".to_string(),
                module: "ghost.wasm".to_string(),
                entry_point: None,
            }],
            base_dir: "/nonexistent".into(),
            ..Config::default()
        };

        match RuntimeBuilder::from_config(&cfg) {
            Err(ModuleMapError::ModuleCreationFailed { module_id, path, .. }) => {
                assert_eq!(module_id, "ghost");
                assert_eq!(path, "ghost.wasm");
            }
            Err(other) => panic!("Expected ModuleCreationFailed, got {}", other),
            Ok(_) => panic!("Expected ModuleCreationFailed"),
        }
    }

    #[test]
    fn test_stages_follow_module_order_and_entry_points() {
        let dir = TempDir::new().unwrap();
        for name in ["a", "b"] {
            std::fs::write(
                dir.path().join(format!("{}.wat", name)),
                "(module (func (export \"act\") (result i32) (i32.const 1)))",
            )
            .unwrap();
        }

        let cfg = Config {
            strategy: Strategy::FanOut,
            entry_point: "act".to_string(),
            modules: vec![
                ModuleConfig {
                    id: "b".to_string(),
                    module: "b.wat".to_string(),
                    entry_point: Some("other".to_string()),
                },
                ModuleConfig {
                    id: "a".to_string(),
                    module: "a.wat".to_string(),
                    entry_point: None,
                },
            ],
            base_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        let (stages, executor) = RuntimeBuilder::from_config(&cfg).unwrap();
        assert_eq!(executor.strategy_name(), "fan_out");
        let described: Vec<_> = stages
            .iter()
            .map(|s| (s.module_id().to_string(), s.function.clone()))
            .collect();
        assert_eq!(
            described,
            vec![
                ("b".to_string(), "other".to_string()),
                ("a".to_string(), "act".to_string()),
            ]
        );
    }
}
