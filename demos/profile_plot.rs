use gnuplot::*;
use otg_motion::{axis, KinematicLimits, KinematicState};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    // -----------------------
    // 1. Set up parameters
    // -----------------------
    let start = KinematicState::new(0.0, 5.0, -4.0);
    let goal = KinematicState::new(50.0, 0.0, 0.0);
    let limits = KinematicLimits::new(20.0, -20.0, 10.0, -15.0, 40.0);

    // ------------------------------------
    // 2. Minimal duration, then stretched
    // ------------------------------------
    let block = axis::min_duration(&start, &goal, &limits)?;
    let total_time = 1.25 * block.t_min;
    let profile = if block.is_blocked(total_time) {
        *block.profile_at(total_time)
    } else {
        axis::fixed_duration(&start, &goal, &limits, total_time)?
    };
    let total_time = profile.duration();

    // -------------------------
    // 3. Sample the trajectory
    // -------------------------
    let sampling_rate = 1000.0; // points per second
    let num_points = (sampling_rate * total_time).ceil() as usize + 1;

    let mut time_axis = Vec::with_capacity(num_points);
    let mut positions = Vec::with_capacity(num_points);
    let mut velocities = Vec::with_capacity(num_points);
    let mut accelerations = Vec::with_capacity(num_points);
    for i in 0..num_points {
        let t = i as f64 / sampling_rate;
        let (pos, vel, acc, _) = profile.state_at_time(t);
        time_axis.push(t);
        positions.push(pos);
        velocities.push(vel);
        accelerations.push(acc);
    }

    let extrema = profile.position_extrema();
    println!(
        "Minimal time {:.3} s, plotted {:.3} s, position range [{:.3}, {:.3}]",
        block.t_min, total_time, extrema.min, extrema.max
    );
    for (i, t) in profile.durations().iter().enumerate() {
        println!("  phase {i}: {t:.4} s");
    }

    // --------------
    // 4. Plot data
    // --------------
    let mut fg = Figure::new();
    {
        let axes = fg.axes2d();
        axes.set_title("Position, Velocity, Acceleration vs. Time", &[]);
        axes.set_x_label("Time (s)", &[]);
        axes.set_y_label("Position derivatives", &[]);
        axes.lines(&time_axis, &positions, &[Color("blue"), Caption("Position")]);
        axes.lines(&time_axis, &velocities, &[Color("red"), Caption("Velocity")]);
        axes.lines(&time_axis, &accelerations, &[Color("green"), Caption("Acceleration")]);
    }

    // Attempt to show in a pop-up window (might require gnuplot installed)
    fg.show().map_err(|e| format!("Failed to display plot: {e}"))?;
    Ok(())
}
