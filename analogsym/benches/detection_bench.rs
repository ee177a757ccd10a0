use criterion::{black_box, criterion_group, criterion_main, Criterion};
use analogsym::circuit::{Circuit, Device, DeviceParams, DeviceType, Pin};
use analogsym::SymmetryDetector;

/// Chain of differential stages: stage k's outputs drive stage k+1's gates,
/// so detection seeds one pair and propagation walks the rest.
fn chained_stages(stages: usize) -> Circuit {
    let mut circuit = Circuit::new("bench");
    for k in 0..stages {
        let (in_p, in_m) = if k == 0 {
            ("VINP".to_string(), "VINM".to_string())
        } else {
            (format!("N{}_P", k - 1), format!("N{}_M", k - 1))
        };
        for (suffix, gate, drain) in [
            ("A", in_p, format!("N{}_P", k)),
            ("B", in_m, format!("N{}_M", k)),
        ] {
            circuit.add_device(
                Device::new(format!("M{}{}", k, suffix), DeviceType::Nmos)
                    .with_params(DeviceParams::new().with_w(10e-6).with_l(0.18e-6).with_nf(2.0))
                    .with_pin(Pin::new("d").with_net(drain))
                    .with_pin(Pin::new("g").with_net(gate))
                    .with_pin(Pin::new("s").with_net(format!("TAIL{}", k))),
            );
        }
    }
    circuit
}

fn bench_detect(c: &mut Criterion) {
    let circuit = chained_stages(100);

    c.bench_function("detect_200_devices", |b| {
        b.iter(|| {
            let detector = SymmetryDetector::new();
            detector.detect(black_box(&circuit))
        });
    });
}

fn bench_detect_sorted(c: &mut Criterion) {
    let circuit = chained_stages(100);

    c.bench_function("detect_200_devices_sorted", |b| {
        b.iter(|| {
            let detector = SymmetryDetector::with_options(analogsym::DetectionOptions {
                sort_candidates: true,
                propagate: true,
            });
            detector.detect(black_box(&circuit))
        });
    });
}

criterion_group!(benches, bench_detect, bench_detect_sorted);
criterion_main!(benches);
