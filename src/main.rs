use std::process::ExitCode;

use clap::Parser;
use glam::Vec3;

use heightmap_terrain::config::{HeightRange, SceneConfig};
use heightmap_terrain::error::LoadError;
use heightmap_terrain::export;
use heightmap_terrain::model::ModelMesh;
use heightmap_terrain::terrain::Terrain;
use heightmap_terrain::transform::Placement;
use heightmap_terrain::vegetation::VegetationBatch;

#[derive(Parser, Debug)]
#[command(name = "heightmap_terrain")]
#[command(about = "Build a terrain mesh from a height image and scatter vegetation over it")]
struct Args {
    /// Grayscale (or RGB) height image
    heightmap: String,

    /// Height scale applied to the 0-1 image luminance
    #[arg(long)]
    height_scale: Option<f32>,

    /// Vegetation model (Wavefront OBJ); a built-in grass blade is used if omitted
    #[arg(short, long)]
    model: Option<String>,

    /// Number of vegetation instances to place
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Lowest normalized terrain height that accepts vegetation
    #[arg(long)]
    min_height: Option<f32>,

    /// Highest normalized terrain height that accepts vegetation
    #[arg(long)]
    max_height: Option<f32>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Terrain world position as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,0")]
    position: Vec3,

    /// Terrain rotation in degrees as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,0")]
    rotation: Vec3,

    /// Terrain scale as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "1,1,1")]
    scale: Vec3,

    /// JSON scene config; command line flags override its values
    #[arg(short, long)]
    config: Option<String>,

    /// Place instances on all cores
    #[arg(long)]
    parallel: bool,

    /// Export the terrain mesh as OBJ
    #[arg(long)]
    export_obj: Option<String>,

    /// Export the raw instance buffer (8 f32 per instance)
    #[arg(long)]
    export_instances: Option<String>,

    /// Export a top-down PNG of the terrain colours
    #[arg(long)]
    export_preview: Option<String>,

    /// Export a JSON summary of the run
    #[arg(long)]
    export_summary: Option<String>,
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("'{}': {}", p, e)))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z but got {} values", parts.len())),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), LoadError> {
    let mut scene = match &args.config {
        Some(path) => {
            println!("Loading config from {}", path);
            SceneConfig::load(path)?
        }
        None => SceneConfig::default(),
    };

    if let Some(scale) = args.height_scale {
        scene.terrain.height_scale = scale;
    }
    let vegetation = &mut scene.vegetation;
    if let Some(count) = args.count {
        vegetation.count = count;
    }
    vegetation.height_range = HeightRange::new(
        args.min_height.unwrap_or(vegetation.height_range.min),
        args.max_height.unwrap_or(vegetation.height_range.max),
    );
    let seed = args.seed.or(vegetation.seed).unwrap_or_else(rand::random);
    vegetation.seed = Some(seed);

    println!("Loading heightmap {}...", args.heightmap);
    let terrain = Terrain::load(&args.heightmap, scene.terrain)?;
    let mesh = terrain.mesh();
    println!(
        "Terrain: {}x{} grid, {} vertices, {} triangles",
        mesh.width,
        mesh.height,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    if let Some((lo, hi)) = mesh.bounds() {
        println!("Height range: {:.3} to {:.3}", lo.y, hi.y);
    }

    let model = match &args.model {
        Some(path) => ModelMesh::load(path)?,
        None => ModelMesh::grass_blade(),
    };
    println!("Model: {} vertices, {} triangles", model.positions.len(), model.triangle_count());

    let placement = Placement::from_trs(args.position, args.rotation, args.scale);
    let mut batch = VegetationBatch::new(model, scene.vegetation);

    println!(
        "Placing {} instances with seed {} (height window {:.2} to {:.2})...",
        batch.params().count,
        seed,
        batch.params().height_range.min,
        batch.params().height_range.max
    );
    if args.parallel {
        batch.generate_parallel(&terrain, &placement);
    } else {
        batch.generate(&terrain, &placement);
    }
    let stats = batch.stats();
    println!("{}", stats);
    if batch.outcome().is_underfilled() {
        println!(
            "Only {:.1}% of attempts landed inside the height window",
            100.0 * batch.outcome().acceptance_ratio()
        );
    }

    if let Some(path) = &args.export_obj {
        println!("Exporting terrain mesh to {}...", path);
        export::export_obj(mesh, path)?;
    }
    if let Some(path) = &args.export_instances {
        println!("Exporting {} instances to {}...", batch.instance_count(), path);
        export::export_instance_buffer(batch.instances(), path)?;
    }
    if let Some(path) = &args.export_preview {
        println!("Exporting colour preview to {}...", path);
        export::export_color_preview(mesh, path)?;
    }
    if let Some(path) = &args.export_summary {
        println!("Exporting summary to {}...", path);
        let summary = export::RunSummary::new(&args.heightmap, mesh, &stats);
        export::export_summary(&summary, path)?;
    }

    println!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("1,2,3").unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(parse_vec3("-5, 0.5 ,0").unwrap(), Vec3::new(-5.0, 0.5, 0.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "heightmap_terrain",
            "map.png",
            "--count",
            "500",
            "--position",
            "-10,0,4",
            "--parallel",
        ])
        .unwrap();
        assert_eq!(args.count, Some(500));
        assert_eq!(args.position, Vec3::new(-10.0, 0.0, 4.0));
        assert_eq!(args.scale, Vec3::ONE);
        assert!(args.parallel);
    }
}
