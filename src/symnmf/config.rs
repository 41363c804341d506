use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SymNmfError};

// 更新則のハイパーパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SymNmfConfig {
    // 反復回数の上限
    pub max_iterations: usize,
    // 収束判定の閾値（差の二乗和に対して）
    pub epsilon: f64,
    // 前の値と乗法的な補正のブレンド係数
    pub beta: f64,
}

impl Default for SymNmfConfig {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            epsilon: 1e-4,
            beta: 0.5,
        }
    }
}

impl SymNmfConfig {
    /// JSON ファイルから読み込む。省略したフィールドは既定値
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SymNmfError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| SymNmfError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(SymNmfError::validation(format!(
                "beta must be in (0, 1], got {}",
                self.beta
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(SymNmfError::validation(format!(
                "epsilon must be a finite non-negative number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = SymNmfConfig::default();
        assert_eq!(config.max_iterations, 300);
        assert_eq!(config.epsilon, 1e-4);
        assert_eq!(config.beta, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_iterations": 25}}"#).unwrap();
        let config = SymNmfConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.max_iterations, 25);
        assert_eq!(config.beta, 0.5);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "max_iterations = 25").unwrap();
        let err = SymNmfConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, SymNmfError::Config(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_beta = SymNmfConfig {
            beta: 0.0,
            ..SymNmfConfig::default()
        };
        assert!(bad_beta.validate().is_err());
        let bad_epsilon = SymNmfConfig {
            epsilon: f64::NAN,
            ..SymNmfConfig::default()
        };
        assert!(bad_epsilon.validate().is_err());
    }
}
