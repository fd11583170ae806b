//! Interpolation Comparison Example
//!
//! Corrects the same blink with every correction kind and prints how far the
//! reconstructed pupil lies from the blink-free trace.
//!
//! Run with: cargo run -p demos --bin interp_comparison

use blink_engine::{BlinkCorrector, BlinkDetector, CorrectConfig, DetectConfig, InterpKind, WindowSpec};
use ingestion::SyntheticRecording;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let clean = SyntheticRecording::new(1000.0, 3.0).seed(11).build()?;
    let blinked = SyntheticRecording::new(1000.0, 3.0)
        .seed(11)
        .blink(1.5, 0.1, 0.02)
        .build()?;

    let blinks = BlinkDetector::new(DetectConfig::default())?.detect(&blinked.signal)?;
    println!("Detected blinks: {:?}", blinks);

    let kinds = [
        InterpKind::Nearest,
        InterpKind::ZeroOrderHold,
        InterpKind::Linear,
        InterpKind::Spline(2),
        InterpKind::Spline(3),
        InterpKind::Spline(5),
    ];

    println!("{:<18} {:>12} {:>12}", "kind", "rmse", "max |err|");
    for kind in kinds {
        let mut signal = blinked.signal.clone();
        BlinkCorrector::new(CorrectConfig {
            interp: kind,
            window: WindowSpec::Seconds(0.05),
        })
        .correct(&mut signal, &blinks)?;

        let (mut sum_sq, mut max_err, mut n) = (0.0_f64, 0.0_f64, 0usize);
        for blink in &blinks {
            for i in blink.onset..=blink.offset {
                let err = signal.pupil_at(i) - clean.signal.pupil_at(i);
                sum_sq += err * err;
                max_err = max_err.max(err.abs());
                n += 1;
            }
        }
        let rmse = if n > 0 { (sum_sq / n as f64).sqrt() } else { 0.0 };
        println!("{:<18} {:>12.5} {:>12.5}", kind.to_string(), rmse, max_err);
    }

    Ok(())
}
