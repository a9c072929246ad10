#![cfg(test)]

use std::sync::Arc;

use super::cache::{BitKey, CacheStats, KernelCache, SpectrumKey, DEFAULT_KERNEL_CACHE_CAPACITY};
use super::factory::KernelFactory;
use super::params::Device;

#[test]
fn repeated_lookup_returns_the_stored_allocation() {
    let mut cache: KernelCache<u32, Vec<f64>> = KernelCache::new(4);
    let first = cache.get_or_insert_with(7, || vec![1.0, 2.0]);
    let second = cache.get_or_insert_with(7, || panic!("must not recompute"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 1,
            misses: 1,
            entries: 1
        }
    );
}

#[test]
fn distinct_keys_compute_distinct_values() {
    let mut cache: KernelCache<BitKey, f64> = KernelCache::new(4);
    let a = cache.get_or_insert_with(1.0.into(), || 1.0);
    let b = cache.get_or_insert_with(2.0.into(), || 2.0);
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 2);
}

#[test]
fn eviction_drops_the_least_recently_used_entry() {
    let mut cache: KernelCache<u32, u32> = KernelCache::new(2);
    cache.get_or_insert_with(1, || 10);
    cache.get_or_insert_with(2, || 20);
    // touch 1 so that 2 becomes the eviction candidate
    cache.get_or_insert_with(1, || panic!("must hit"));
    cache.get_or_insert_with(3, || 30);
    assert!(cache.contains(&1));
    assert!(!cache.contains(&2));
    assert!(cache.contains(&3));
    assert_eq!(cache.len(), 2);
}

#[test]
fn evicted_entries_are_recomputed_on_return() {
    let mut cache: KernelCache<u32, u32> = KernelCache::new(1);
    let mut computations = 0;
    for key in [1u32, 2, 1] {
        cache.get_or_insert_with(key, || {
            computations += 1;
            key * 10
        });
    }
    assert_eq!(computations, 3);
    assert_eq!(cache.stats().misses, 3);
    assert_eq!(cache.stats().hits, 0);
}

#[test]
fn clear_drops_entries_and_counters() {
    let mut cache: KernelCache<u32, u32> = KernelCache::new(4);
    cache.get_or_insert_with(1, || 1);
    cache.get_or_insert_with(1, || 1);
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats(), CacheStats::default());
}

#[test]
#[should_panic(expected = "capacity must be non-zero")]
fn zero_capacity_is_rejected() {
    let _: KernelCache<u32, u32> = KernelCache::new(0);
}

#[test]
fn bit_keys_distinguish_negative_zero_and_nan_payloads() {
    assert_eq!(BitKey::from(1.5), BitKey::from(1.5));
    assert_ne!(BitKey::from(0.0), BitKey::from(-0.0));
    assert_ne!(BitKey::from(1.0), BitKey::from(1.0 + f64::EPSILON));
    assert_eq!(SpectrumKey::new(&[1.0, 2.0]), SpectrumKey::new(&[1.0, 2.0]));
    assert_ne!(SpectrumKey::new(&[1.0, 2.0]), SpectrumKey::new(&[2.0, 1.0]));
}

#[test]
fn factory_reuses_the_fresnel_kernel_for_identical_parameters() {
    let mut factory = KernelFactory::new();
    let first = factory.quadratic_phase(64, 0.01, 500e-9, 1e-5, Device::Cpu);
    let second = factory.quadratic_phase(64, 0.01, 500e-9, 1e-5, Device::Cpu);
    assert!(Arc::ptr_eq(&first, &second));
    let stats = factory.stats();
    let quad = stats.iter().find(|(kind, _)| *kind == "quad_phase").unwrap();
    assert_eq!(quad.1.hits, 1);
    assert_eq!(quad.1.misses, 1);
}

#[test]
fn device_flag_keys_separate_cache_entries() {
    let mut factory = KernelFactory::new();
    let cpu = factory.asp_transfer(32, 1e-4, 500e-9, 1e-3, Device::Cpu);
    let gpu = factory.asp_transfer(32, 1e-4, 500e-9, 1e-3, Device::Gpu);
    assert!(!Arc::ptr_eq(&cpu, &gpu));
    let stats = factory.stats();
    let asp = stats.iter().find(|(kind, _)| *kind == "asp").unwrap();
    assert_eq!(asp.1.misses, 2);
}

#[test]
fn factory_caches_are_bounded_per_kind() {
    let mut factory = KernelFactory::new();
    for i in 0..(DEFAULT_KERNEL_CACHE_CAPACITY + 5) {
        factory.quadratic_phase(16, 0.01 + i as f64 * 1e-3, 500e-9, 1e-5, Device::Cpu);
    }
    let stats = factory.stats();
    let quad = stats.iter().find(|(kind, _)| *kind == "quad_phase").unwrap();
    assert_eq!(quad.1.entries, DEFAULT_KERNEL_CACHE_CAPACITY);
    assert_eq!(quad.1.misses, (DEFAULT_KERNEL_CACHE_CAPACITY + 5) as u64);
}

#[test]
fn clear_all_reports_and_resets_every_kind() {
    let mut factory = KernelFactory::with_capacity(3);
    factory.quadratic_phase(16, 0.01, 500e-9, 1e-5, Device::Cpu);
    factory.asp_transfer(16, 1e-4, 500e-9, 1e-3, Device::Cpu);
    let before = factory.clear_all();
    assert_eq!(before.len(), 6);
    assert!(before
        .iter()
        .any(|(kind, s)| *kind == "quad_phase" && s.entries == 1));
    for (_, stats) in factory.stats() {
        assert_eq!(stats, CacheStats::default());
    }
}
