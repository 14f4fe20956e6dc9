use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Directory the recording is written to. Defaults to the XDG data dir.
    #[serde(default)]
    pub recording_dir: Option<PathBuf>,

    #[serde(default = "default_recording_filename")]
    pub recording_filename: String,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_channels")]
    pub channels: u16,

    #[serde(default = "default_echo_delay_ms")]
    pub echo_delay_ms: u64,

    #[serde(default = "default_echo_level")]
    pub echo_level: f32,

    #[serde(default = "default_reverb_level")]
    pub reverb_level: f32,
}

fn default_recording_filename() -> String {
    "recorded_voice.wav".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_channels() -> u16 {
    1
}

fn default_echo_delay_ms() -> u64 {
    350
}

fn default_echo_level() -> f32 {
    0.45
}

fn default_reverb_level() -> f32 {
    0.35
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recording_dir: None,
            recording_filename: default_recording_filename(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            echo_delay_ms: default_echo_delay_ms(),
            echo_level: default_echo_level(),
            reverb_level: default_reverb_level(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/pitchbooth/config.json)
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// The fixed, well-known location of the recording. One file,
    /// overwritten on each new recording.
    pub fn recording_path(&self) -> Result<PathBuf> {
        let dir = match &self.recording_dir {
            Some(dir) => dir.clone(),
            None => Self::data_dir()?,
        };
        Ok(dir.join(&self.recording_filename))
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("pitchbooth").join("config.json"))
    }

    fn data_dir() -> Result<PathBuf> {
        let data_dir = if let Ok(dir) = std::env::var("XDG_DATA_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".local").join("share")
        };

        Ok(data_dir.join("pitchbooth"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.recording_filename.is_empty() {
            return Err(anyhow::anyhow!("recording_filename cannot be empty"));
        }

        if self.sample_rate == 0 {
            return Err(anyhow::anyhow!("sample_rate cannot be zero"));
        }

        if !(1..=2).contains(&self.channels) {
            return Err(anyhow::anyhow!("channels must be 1 or 2"));
        }

        if !(0.0..=1.0).contains(&self.echo_level) || !(0.0..=1.0).contains(&self.reverb_level) {
            return Err(anyhow::anyhow!(
                "echo_level and reverb_level must be between 0.0 and 1.0"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_effect_levels() {
        let config = Config {
            echo_level: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn recording_path_honors_configured_directory() {
        let config = Config {
            recording_dir: Some(PathBuf::from("/tmp/booth")),
            ..Config::default()
        };
        assert_eq!(
            config.recording_path().unwrap(),
            PathBuf::from("/tmp/booth/recorded_voice.wav")
        );
    }
}
