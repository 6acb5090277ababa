use std::sync::atomic::{AtomicUsize, Ordering};

/// 内部容器统计信息（原子计数器）
#[derive(Default)]
pub(crate) struct InnerStats {
    disabled: bool,
    total_resolutions: AtomicUsize,
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
    transient_creations: AtomicUsize,
}

impl InnerStats {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            disabled: !enabled,
            ..Self::default()
        }
    }

    fn bump(&self, counter: &AtomicUsize) {
        if !self.disabled {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_resolution(&self) {
        self.bump(&self.total_resolutions);
    }

    pub(crate) fn record_hit(&self) {
        self.bump(&self.cache_hits);
    }

    pub(crate) fn record_miss(&self) {
        self.bump(&self.cache_misses);
    }

    pub(crate) fn record_transient(&self) {
        self.bump(&self.transient_creations);
    }

    pub(crate) fn snapshot(&self, registered_bindings: usize) -> ContainerStats {
        ContainerStats {
            total_resolutions: self.total_resolutions.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            transient_creations: self.transient_creations.load(Ordering::Relaxed),
            registered_bindings,
        }
    }

    pub(crate) fn reset(&self) {
        self.total_resolutions.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.transient_creations.store(0, Ordering::Relaxed);
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 总解析次数（包括依赖链中的每一级）
    pub total_resolutions: usize,
    /// 单例缓存命中次数
    pub cache_hits: usize,
    /// 单例缓存未命中次数
    pub cache_misses: usize,
    /// 瞬态服务创建次数
    pub transient_creations: usize,
    /// 当前绑定数量
    pub registered_bindings: usize,
}

impl ContainerStats {
    /// 获取缓存命中率（小数形式）
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    /// 获取性能指标摘要
    pub fn performance_summary(&self) -> String {
        format!(
            "Container: {} total resolutions, {:.1}% cache hit rate, {} transient creations, {} registered bindings",
            self.total_resolutions,
            self.hit_rate() * 100.0,
            self.transient_creations,
            self.registered_bindings
        )
    }
}
