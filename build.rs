use std::cmp::Ordering;
use std::env;
use std::process::Command;

// Environment variable that pins the backend instead of detecting it
const BACKEND_OVERRIDE: &str = "NUMKERN_BACKEND";

// CPU features the kernels have an implementation for
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    target_arch: &'static str,
    cfg_flag: &'static str,
    detected: bool,
}

impl CpuFeature {
    // Define priority order between CPU Features (Lowest number == Highest Priority)
    fn priority(&self) -> usize {
        match self.name {
            "neon" => 0,
            "sse4_2" => 1,
            _ => usize::MAX, // lowest priority by default
        }
    }

    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse4_2",
                target_arch: "x86_64",
                cfg_flag: "sse",
                detected: false,
            },
            CpuFeature {
                name: "neon",
                target_arch: "aarch64",
                cfg_flag: "neon",
                detected: false,
            },
        ]
    }

    // NEON is part of the AArch64 base ISA, it needs no probing
    fn is_baseline(&self) -> bool {
        self.name == "neon"
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Feature detection trait to make implementations more modular
trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

// Linux CPU feature detector
struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            let contents = cpuinfo.to_lowercase();
            for feature in features.iter_mut() {
                feature.detected |= contents.contains(feature.name);
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

// macOS CPU feature detector
struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let output = Command::new("sysctl").args(["-a"]).output();

        if let Ok(output) = output {
            let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();

            for feature in features.iter_mut() {
                match feature.name {
                    "sse4_2" => feature.detected |= contents.contains("hw.optional.sse4_2: 1"),
                    "neon" => feature.detected |= contents.contains("hw.optional.neon: 1"),
                    _ => {}
                }
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

// Factory that creates the appropriate detector for the current OS
struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        let detectors = Self::cpu_features_detectors();

        for detector in detectors {
            if detector.is_applicable() {
                detector.detect_features(features);
                break;
            }
        }
    }

    fn select(features: &mut [CpuFeature], target_arch: &str) -> &'static str {
        features.sort();

        features
            .iter()
            .filter(|cpu_feature| cpu_feature.target_arch == target_arch)
            .find(|cpu_feature| cpu_feature.detected || cpu_feature.is_baseline())
            .map(|cpu_feature| cpu_feature.cfg_flag)
            .unwrap_or("fallback")
    }

    fn forced(features: &[CpuFeature], target_arch: &str) -> Option<&'static str> {
        let requested = env::var(BACKEND_OVERRIDE).ok()?;
        let requested = requested.trim().to_lowercase();

        if requested == "fallback" {
            return Some("fallback");
        }

        match features.iter().find(|f| f.cfg_flag == requested) {
            Some(feature) if feature.target_arch == target_arch => Some(feature.cfg_flag),
            Some(feature) => panic!(
                "{BACKEND_OVERRIDE}={requested} needs target_arch {}, building for {target_arch}",
                feature.target_arch
            ),
            None => panic!(
                "{BACKEND_OVERRIDE}={requested} is not one of: sse, neon, fallback"
            ),
        }
    }

    fn apply(cfg_flag: &str) {
        println!("applying: {cfg_flag}");

        println!("cargo:rustc-cfg={cfg_flag}");

        println!("cargo::rustc-check-cfg=cfg(sse)");
        println!("cargo::rustc-check-cfg=cfg(neon)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");
    }
}

fn main() {
    println!("cargo:rerun-if-env-changed={BACKEND_OVERRIDE}");
    println!("cargo:rerun-if-changed=build.rs");

    let mut features = CpuFeature::features();

    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();

    // Determine if we're cross-compiling
    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();

    let is_native_build = host == target;

    // Only run CPU detection for native builds
    if is_native_build {
        PlatformDetector::detect_cpu_features(&mut features);
    }

    let cfg_flag = PlatformDetector::forced(&features, &target_arch)
        .unwrap_or_else(|| PlatformDetector::select(&mut features, &target_arch));

    PlatformDetector::apply(cfg_flag);
}
