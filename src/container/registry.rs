//! 两级注册表：类型 -> 限定名 -> 绑定

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use super::binding::{Binding, TypeKey};
use crate::errors::ContainerError;

/// 绑定注册表 - 使用DashMap提供并发安全的读写
///
/// 查找时只克隆出 `Arc<Binding>`，解析器运行期间不持有任何分片锁。
#[derive(Default)]
pub struct Registry {
    bindings: DashMap<TypeKey, HashMap<String, Arc<Binding>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入绑定，同一 (类型, 限定名) 已存在时拒绝，不会覆盖
    pub fn insert(&self, binding: Binding) -> Result<(), ContainerError> {
        let key = binding.type_key();
        let mut slots = self.bindings.entry(key).or_default();
        if slots.contains_key(binding.qualifier()) {
            return Err(ContainerError::DuplicateBinding {
                type_name: key.name(),
                qualifier: binding.qualifier().to_string(),
            });
        }
        slots.insert(binding.qualifier().to_string(), Arc::new(binding));
        Ok(())
    }

    /// 按候选限定名依次查找
    ///
    /// 类型从未注册返回 `BindingNotFound`；类型存在但没有候选匹配返回 `QualifierNotMatched`。
    pub fn lookup(&self, key: TypeKey, candidates: &[String]) -> Result<Arc<Binding>, ContainerError> {
        let slots = self
            .bindings
            .get(&key)
            .ok_or(ContainerError::BindingNotFound { type_name: key.name() })?;

        if let Some(binding) = candidates.iter().find_map(|q| slots.get(q)) {
            return Ok(binding.clone());
        }

        let mut registered: Vec<String> = slots.keys().cloned().collect();
        registered.sort();
        Err(ContainerError::QualifierNotMatched {
            type_name: key.name(),
            candidates: candidates.to_vec(),
            registered,
        })
    }

    pub fn contains(&self, key: TypeKey, qualifier: &str) -> bool {
        self.bindings
            .get(&key)
            .map(|slots| slots.contains_key(qualifier))
            .unwrap_or(false)
    }

    /// 某类型已注册的限定名（排序后）
    pub fn qualifiers(&self, key: TypeKey) -> Vec<String> {
        let mut qualifiers: Vec<String> = self
            .bindings
            .get(&key)
            .map(|slots| slots.keys().cloned().collect())
            .unwrap_or_default();
        qualifiers.sort();
        qualifiers
    }

    pub fn types(&self) -> Vec<TypeKey> {
        self.bindings.iter().map(|entry| *entry.key()).collect()
    }

    /// 绑定总数
    pub fn len(&self) -> usize {
        self.bindings.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 删除所有类型条目
    pub fn clear(&self) {
        self.bindings.clear();
    }
}
