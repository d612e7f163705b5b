//! Kernels tag their log events with their own name

use std::fmt;
use std::sync::{Arc, Mutex};

use numkern::{aany, asum, findindex, mul, BinaryArgs, CompareOp};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

/// Collects the `kernel` field of every event.
#[derive(Clone, Default)]
struct KernelNames(Arc<Mutex<Vec<String>>>);

struct KernelField(Option<String>);

impl Visit for KernelField {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "kernel" {
            self.0 = Some(value.to_owned());
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}

impl Subscriber for KernelNames {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut field = KernelField(None);
        event.record(&mut field);
        if let Some(name) = field.0 {
            self.0.lock().unwrap().push(name);
        }
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

fn kernels_logged(f: impl FnOnce()) -> Vec<String> {
    let names = KernelNames::default();
    tracing::subscriber::with_default(names.clone(), f);
    let logged = names.0.lock().unwrap().clone();
    logged
}

#[test]
fn test_short_scans_log_their_own_kernel() {
    let data = [1u32, 2, 3];

    let logged = kernels_logged(|| assert!(aany(CompareOp::Eq, &data, 3)));
    assert_eq!(logged, ["aany"]);

    let logged = kernels_logged(|| assert_eq!(findindex(CompareOp::Eq, &data, 3), Some(2)));
    assert_eq!(logged, ["findindex"]);
}

#[test]
fn test_long_scan_logs_nothing() {
    let data = vec![7i16; 64];
    let logged = kernels_logged(|| assert!(!aany(CompareOp::Ne, &data, 7)));
    assert!(logged.is_empty(), "{logged:?}");
}

#[test]
fn test_failures_name_the_kernel() {
    let lhs = [1i32; 20];
    let rhs = [1i32; 19];
    let mut out = [0i32; 20];
    let logged = kernels_logged(|| {
        assert!(mul(BinaryArgs::ArrayArray { lhs: &lhs, rhs: &rhs, out: &mut out }).is_err());
    });
    assert!(logged.iter().any(|name| name == "mul"), "{logged:?}");

    let data = vec![i64::MAX, 1];
    let logged = kernels_logged(|| assert!(asum(&data).is_err()));
    assert_eq!(logged, ["asum"]);
}
