//! Demo of linked slicing and cross-section reconstruction.
//!
//! Generates the two-group demo cloud, brushes the points lying in each
//! view's depth slice, and joins the two selections into a surface.
//!
//! Pass a JSON session config as the first argument to override the
//! defaults. Set `RUST_LOG=debug` to follow every re-derivation.

use slicelink::*;

fn print_surface(state: &SurfaceState) {
    match state {
        SurfaceState::NotArmed => println!("  surface: not requested"),
        SurfaceState::Built { surface, .. } => println!(
            "  surface: {} vertices, {} faces",
            surface.num_vertices(),
            surface.face_count()
        ),
        SurfaceState::Failed { .. } => println!("  surface: empty"),
    }
    if let Some(message) = state.message() {
        println!("  message: {message}");
    }
}

fn main() -> Result<()> {
    init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };
    let mut session = Session::new(config)?;

    // Equality slices so each selection is a thin band at one depth
    session.set_equality_slice("view-1", -0.5)?;
    session.set_equality_slice("view-2", 0.5)?;

    let bands: Vec<(String, Vec<PointId>)> = session
        .derived()
        .slices
        .iter()
        .map(|(view, ids)| (view.clone(), ids.iter().copied().collect()))
        .collect();
    for (view, ids) in &bands {
        println!("{view}: {} points in slice", ids.len());
        session.select(view, ids.iter().copied())?;
    }

    println!("before pressing generate:");
    print_surface(&session.derived().surface);

    let derived = session.press_generate()?;
    println!("after pressing generate:");
    print_surface(&derived.surface);
    println!(
        "  highlighted {} of {} points, scene has {} layers",
        derived.highlight.num_selected(),
        derived.cloud.len(),
        derived.scene.len()
    );

    // A new seed replaces the cloud; the old selections no longer apply
    session.set_seed(session.inputs().seed.wrapping_add(1))?;
    println!("after reseeding:");
    print_surface(&session.derived().surface);

    // Sweep a square profile between the two slice depths
    let square = [
        DVec2::new(-1.0, -1.0),
        DVec2::new(1.0, -1.0),
        DVec2::new(1.0, 1.0),
        DVec2::new(-1.0, 1.0),
    ];
    let prism = extrude_profile(&square, PlaneSpec::XY, -0.5, 0.5, RingClosure::Closed)?;
    println!("extruded profile: {} faces", prism.face_count());

    println!("selection table:");
    for record in session.selection_records().iter().take(5) {
        println!(
            "  {:>7} #{:<4} {:<6} ({:+.3}, {:+.3}) @ {:+.3}",
            record.view, record.id, record.group, record.x, record.y, record.depth
        );
    }
    Ok(())
}
