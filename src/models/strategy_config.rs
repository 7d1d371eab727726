use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::SchedulerDefaults;
use crate::error::TradingError;

/// VWAP 프로필이 비어 있을 때 사용하는 균등 구간 수
pub const DEFAULT_VWAP_BUCKETS: usize = 10;

/// 알고리즘별 파라미터
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlgoParams {
    /// 거래량 프로필 가중치 (상대값)
    Vwap { volume_profile: Vec<f64> },
    /// 균등 분할 수
    Twap { num_slices: u32 },
    /// 노출 수량, 동시 노출 슬라이스 수, 숨김 비율
    Iceberg {
        display_size: f64,
        max_active_slices: usize,
        secrecy_factor: f64,
    },
}

impl AlgoParams {
    pub fn kind(&self) -> &'static str {
        match self {
            AlgoParams::Vwap { .. } => "vwap",
            AlgoParams::Twap { .. } => "twap",
            AlgoParams::Iceberg { .. } => "iceberg",
        }
    }
}

/// 실행 전략 설정
///
/// 실행 중(Running/Paused)에는 변경할 수 없다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyConfig {
    pub id: String,
    pub name: String,
    pub total_volume: f64,
    pub interval_ms: u64,
    pub duration_minutes: Option<u64>,
    pub variance_percent: f64,
    pub min_child_size: f64,
    pub max_child_size: f64,
    pub enabled: bool,
    pub algo: AlgoParams,
}

impl StrategyConfig {
    /// 기본값으로 새 설정 생성
    pub fn new(name: impl Into<String>, algo: AlgoParams, defaults: &SchedulerDefaults) -> Self {
        StrategyConfig {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            total_volume: defaults.total_volume,
            interval_ms: defaults.interval_ms,
            duration_minutes: None,
            variance_percent: defaults.variance_percent,
            min_child_size: defaults.min_child_size,
            max_child_size: defaults.max_child_size,
            enabled: false,
            algo,
        }
    }

    pub fn vwap(name: impl Into<String>, defaults: &SchedulerDefaults) -> Self {
        Self::new(name, AlgoParams::Vwap { volume_profile: Vec::new() }, defaults)
    }

    pub fn twap(name: impl Into<String>, defaults: &SchedulerDefaults) -> Self {
        Self::new(name, AlgoParams::Twap { num_slices: defaults.twap_slices }, defaults)
    }

    pub fn iceberg(name: impl Into<String>, defaults: &SchedulerDefaults) -> Self {
        Self::new(
            name,
            AlgoParams::Iceberg {
                display_size: defaults.iceberg_display_size,
                max_active_slices: defaults.iceberg_max_active_slices,
                secrecy_factor: defaults.iceberg_secrecy_factor,
            },
            defaults,
        )
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_total_volume(mut self, total_volume: f64) -> Self {
        self.total_volume = total_volume;
        self
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    pub fn with_duration_minutes(mut self, duration_minutes: u64) -> Self {
        self.duration_minutes = Some(duration_minutes);
        self
    }

    pub fn with_variance_percent(mut self, variance_percent: f64) -> Self {
        self.variance_percent = variance_percent;
        self
    }

    pub fn with_child_bounds(mut self, min_child_size: f64, max_child_size: f64) -> Self {
        self.min_child_size = min_child_size;
        self.max_child_size = max_child_size;
        self
    }

    /// UI 폼 입력으로부터 설정 생성
    ///
    /// 숫자가 아니거나 0 이하인 값은 기본값으로 대체한다.
    pub fn from_form(
        kind: &str,
        name: Option<&str>,
        params: &Value,
        defaults: &SchedulerDefaults,
    ) -> Result<Self, TradingError> {
        let algo = match kind.to_lowercase().as_str() {
            "vwap" => AlgoParams::Vwap {
                volume_profile: params["volume_profile"]
                    .as_array()
                    .map(|values| values.iter().filter_map(Value::as_f64).collect())
                    .unwrap_or_default(),
            },
            "twap" => AlgoParams::Twap {
                num_slices: whole_number(params, "num_slices")
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or(defaults.twap_slices),
            },
            "iceberg" => AlgoParams::Iceberg {
                display_size: positive_number(params, "display_size")
                    .unwrap_or(defaults.iceberg_display_size),
                max_active_slices: whole_number(params, "max_active_slices")
                    .and_then(|n| usize::try_from(n).ok())
                    .unwrap_or(defaults.iceberg_max_active_slices),
                secrecy_factor: positive_number(params, "secrecy_factor")
                    .unwrap_or(defaults.iceberg_secrecy_factor),
            },
            other => {
                return Err(TradingError::InvalidParameter(format!("Unknown strategy kind: {}", other)))
            }
        };

        let mut config = Self::new(name.unwrap_or(kind).to_string(), algo, defaults);
        if let Some(id) = params["id"].as_str().filter(|id| !id.is_empty()) {
            config.id = id.to_string();
        }
        config.total_volume = positive_number(params, "total_volume").unwrap_or(defaults.total_volume);
        config.interval_ms = whole_number(params, "interval_ms").unwrap_or(defaults.interval_ms);
        config.duration_minutes = whole_number(params, "duration_minutes");
        config.variance_percent = number(params, "variance_percent")
            .filter(|v| (0.0..=100.0).contains(v))
            .unwrap_or(defaults.variance_percent);
        config.min_child_size = number(params, "min_child_size")
            .filter(|v| *v >= 0.0)
            .unwrap_or(defaults.min_child_size);
        config.max_child_size = positive_number(params, "max_child_size").unwrap_or(defaults.max_child_size);

        config.validate()?;
        Ok(config)
    }

    /// 설정 값 검증
    pub fn validate(&self) -> Result<(), TradingError> {
        if self.id.is_empty() {
            return Err(TradingError::InvalidParameter("Strategy id must not be empty".to_string()));
        }
        if !(self.total_volume.is_finite() && self.total_volume > 0.0) {
            return Err(TradingError::InvalidParameter("Total volume must be positive".to_string()));
        }
        if self.interval_ms == 0 {
            return Err(TradingError::InvalidParameter("Interval must be at least 1 ms".to_string()));
        }
        if !(0.0..=100.0).contains(&self.variance_percent) {
            return Err(TradingError::InvalidParameter(
                format!("Variance percent out of range: {}", self.variance_percent)
            ));
        }
        if self.min_child_size < 0.0 || self.max_child_size <= 0.0 {
            return Err(TradingError::InvalidParameter("Child order bounds must be positive".to_string()));
        }
        if self.min_child_size > self.max_child_size {
            return Err(TradingError::InvalidParameter(
                format!("Min child size {} exceeds max child size {}", self.min_child_size, self.max_child_size)
            ));
        }

        match &self.algo {
            AlgoParams::Vwap { volume_profile } => {
                if volume_profile.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(TradingError::InvalidParameter("Volume profile weights must be non-negative".to_string()));
                }
            }
            AlgoParams::Twap { num_slices } => {
                if *num_slices == 0 {
                    return Err(TradingError::InvalidParameter("TWAP needs at least one slice".to_string()));
                }
            }
            AlgoParams::Iceberg { display_size, max_active_slices, secrecy_factor } => {
                if *display_size <= 0.0 {
                    return Err(TradingError::InvalidParameter("Display size must be positive".to_string()));
                }
                if *max_active_slices == 0 {
                    return Err(TradingError::InvalidParameter("Iceberg needs at least one active slice".to_string()));
                }
                if !secrecy_factor.is_finite() || *secrecy_factor < 0.0 {
                    return Err(TradingError::InvalidParameter("Secrecy factor must be non-negative".to_string()));
                }
            }
        }

        Ok(())
    }
}

/// 숫자 또는 숫자 문자열 파싱
fn number(params: &Value, key: &str) -> Option<f64> {
    let value = &params[key];
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn positive_number(params: &Value, key: &str) -> Option<f64> {
    number(params, key).filter(|v| *v > 0.0)
}

/// 1 이상의 정수 값 (소수점 이하 버림)
///
/// 버림 결과가 0이 되는 값(예: 0.5)은 없는 값으로 취급한다.
fn whole_number(params: &Value, key: &str) -> Option<u64> {
    number(params, key)
        .filter(|v| *v >= 1.0 && *v <= u64::MAX as f64)
        .map(|v| v.floor() as u64)
}
