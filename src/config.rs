use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::integrator::Method;
use crate::core::topology::TopologyKind;
use crate::sim::engine::SimParams;
use crate::sim::seeding::FreqDistribution;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleConfig {
    #[serde(default = "EnsembleConfig::default_count")]
    pub count: usize,
    #[serde(default = "EnsembleConfig::default_coupling")]
    pub coupling: f32,
}

impl EnsembleConfig {
    fn default_count() -> usize {
        100
    }
    fn default_coupling() -> f32 {
        2.0
    }
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            count: Self::default_count(),
            coupling: Self::default_coupling(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    #[serde(default = "IntegrationConfig::default_dt")]
    pub dt: f32,
    #[serde(default)]
    pub method: Method,
    #[serde(default = "IntegrationConfig::default_noise_amplitude")]
    pub noise_amplitude: f32,
}

impl IntegrationConfig {
    fn default_dt() -> f32 {
        0.01
    }
    fn default_noise_amplitude() -> f32 {
        0.0
    }
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            dt: Self::default_dt(),
            method: Method::default(),
            noise_amplitude: Self::default_noise_amplitude(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    #[serde(default)]
    pub kind: TopologyKind,
    #[serde(default = "TopologyConfig::default_edge_prob")]
    pub edge_prob: f32,
}

impl TopologyConfig {
    fn default_edge_prob() -> f32 {
        0.1
    }
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            kind: TopologyKind::default(),
            edge_prob: Self::default_edge_prob(),
        }
    }
}

/// Frequency-seeding distribution, flattened for the TOML surface:
/// gaussian(center, width = std dev), cauchy(center, width = scale),
/// uniform over [center - width, center + width].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FreqKind {
    #[default]
    Gaussian,
    Cauchy,
    Uniform,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedingConfig {
    #[serde(default)]
    pub freq_kind: FreqKind,
    #[serde(default = "SeedingConfig::default_freq_center")]
    pub freq_center: f32,
    #[serde(default = "SeedingConfig::default_freq_width")]
    pub freq_width: f32,
    #[serde(default)]
    pub seed: u64,
}

impl SeedingConfig {
    fn default_freq_center() -> f32 {
        0.0
    }
    fn default_freq_width() -> f32 {
        1.0
    }

    pub fn freq_dist(&self) -> FreqDistribution {
        let center = self.freq_center;
        let width = self.freq_width.max(0.0);
        match self.freq_kind {
            FreqKind::Gaussian => FreqDistribution::Gaussian {
                mean: center,
                std_dev: width,
            },
            FreqKind::Cauchy => FreqDistribution::Cauchy {
                location: center,
                scale: width,
            },
            FreqKind::Uniform => FreqDistribution::Uniform {
                lo: center - width,
                hi: center + width,
            },
        }
    }
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            freq_kind: FreqKind::default(),
            freq_center: Self::default_freq_center(),
            freq_width: Self::default_freq_width(),
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "RunConfig::default_speed")]
    pub speed: f32,
}

impl RunConfig {
    fn default_speed() -> f32 {
        1.0
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            speed: Self::default_speed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub ensemble: EnsembleConfig,
    #[serde(default)]
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub topology: TopologyConfig,
    #[serde(default)]
    pub seeding: SeedingConfig,
    #[serde(default)]
    pub run: RunConfig,
}

impl AppConfig {
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            count: self.ensemble.count,
            coupling: self.ensemble.coupling,
            dt: self.integration.dt,
            noise_amplitude: self.integration.noise_amplitude,
            speed: self.run.speed,
            topology: self.topology.kind,
            edge_prob: self.topology.edge_prob,
            method: self.integration.method,
            freq_dist: self.seeding.freq_dist(),
            seed: self.seeding.seed,
        }
    }

    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write commented defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                let mut commented = String::new();
                for line in text.lines() {
                    let trimmed = line.trim();
                    if trimmed.is_empty() || (trimmed.starts_with('[') && trimmed.ends_with(']')) {
                        commented.push_str(line);
                    } else {
                        commented.push_str("# ");
                        commented.push_str(line);
                    }
                    commented.push('\n');
                }
                if let Err(err) = fs::write(path_obj, commented) {
                    eprintln!("Failed to write default config to {path}: {err}");
                }
            }
            Err(_) => {
                eprintln!("Failed to serialize default config; continuing with defaults");
            }
        }
        default_cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_path(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "synchrona_config_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[test]
    fn load_or_default_writes_commented_defaults() {
        let path = unique_path("defaults.toml");
        let path_str = path.to_string_lossy().to_string();
        let _ = fs::remove_file(&path);

        let cfg = AppConfig::load_or_default(&path_str);
        assert!(path.exists(), "config file should be created");
        assert_eq!(cfg.ensemble.count, 100);
        assert_eq!(cfg.ensemble.coupling, 2.0);
        assert_eq!(cfg.integration.dt, 0.01);
        assert_eq!(cfg.integration.method, Method::Euler);
        assert_eq!(cfg.topology.kind, TopologyKind::AllToAll);
        assert_eq!(cfg.run.speed, 1.0);

        let contents = fs::read_to_string(&path).expect("read written config");
        assert!(contents.contains("# count = 100"), "count line commented out");
        assert!(contents.contains("[ensemble]"), "section header kept");

        // The commented file must round-trip to the same defaults.
        let reloaded = AppConfig::load_or_default(&path_str);
        assert_eq!(reloaded.ensemble.count, cfg.ensemble.count);
        assert_eq!(reloaded.integration.dt, cfg.integration.dt);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_or_default_reads_existing() {
        let path = unique_path("custom.toml");
        let path_str = path.to_string_lossy().to_string();
        let text = r#"
[ensemble]
count = 500
coupling = 0.5

[integration]
dt = 0.002
method = "rk4"
noise_amplitude = 0.3

[topology]
kind = "random"
edge_prob = 0.25

[seeding]
freq_kind = "cauchy"
freq_center = 1.0
freq_width = 0.2
seed = 7

[run]
speed = 3.0
"#;
        fs::write(&path, text).unwrap();

        let cfg = AppConfig::load_or_default(&path_str);
        assert_eq!(cfg.ensemble.count, 500);
        assert_eq!(cfg.ensemble.coupling, 0.5);
        assert_eq!(cfg.integration.dt, 0.002);
        assert_eq!(cfg.integration.method, Method::Rk4);
        assert_eq!(cfg.integration.noise_amplitude, 0.3);
        assert_eq!(cfg.topology.kind, TopologyKind::Random);
        assert_eq!(cfg.topology.edge_prob, 0.25);
        assert_eq!(cfg.seeding.freq_kind, FreqKind::Cauchy);
        assert_eq!(cfg.run.speed, 3.0);

        let params = cfg.sim_params();
        assert_eq!(params.count, 500);
        assert_eq!(params.seed, 7);
        assert_eq!(
            params.freq_dist,
            FreqDistribution::Cauchy {
                location: 1.0,
                scale: 0.2
            }
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn partial_config_falls_back_per_field() {
        let path = unique_path("partial.toml");
        let path_str = path.to_string_lossy().to_string();
        fs::write(&path, "[ensemble]\ncount = 42\n").unwrap();

        let cfg = AppConfig::load_or_default(&path_str);
        assert_eq!(cfg.ensemble.count, 42);
        assert_eq!(cfg.ensemble.coupling, 2.0, "unset fields keep defaults");
        assert_eq!(cfg.integration.dt, 0.01);

        let _ = fs::remove_file(&path);
    }
}
