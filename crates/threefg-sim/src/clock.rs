//! 可注入的单调时钟
//!
//! 运动进度通过时钟采样计算。把时钟作为依赖注入后，
//! 测试可以手动推进时间，不需要真实等待。

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 单调时钟抽象
pub trait Clock: Send + Sync {
    /// 当前时刻
    fn now(&self) -> Instant;
}

/// 系统单调时钟（生产默认）
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 手动推进的测试时钟
///
/// 克隆共享同一个内部偏移量：持有一个克隆的测试代码可以推进
/// 已注入引擎的那份时钟。
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// 向前推进时间
    pub fn advance(&self, duration: Duration) {
        *self.offset.lock() += duration;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}
