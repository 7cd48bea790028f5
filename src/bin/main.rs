//! F3D Export CLI
//!
//! Convert JSON mesh documents into display list and collision C source.

use clap::{Parser, Subcommand};
use f3d_export::export::{export_collision, export_f3d, CollisionNames};
use f3d_export::scene::{CollisionDoc, MeshDoc};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "f3d-export")]
#[command(author, version, about = "Convert mesh documents to N64 C source", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a render mesh document as display list C source
    Mesh {
        /// Input JSON mesh document
        #[arg(short, long)]
        input: PathBuf,

        /// Output C file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Export a collision document as collision C source
    Collision {
        /// Input JSON collision document
        #[arg(short, long)]
        input: PathBuf,

        /// Output C file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Mesh { input, output } => export_mesh(&input, &output)?,
        Commands::Collision { input, output } => export_collision_doc(&input, &output)?,
    }

    Ok(())
}

fn export_mesh(input: &PathBuf, output: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading mesh document from {:?}...", input);
    let json = fs::read_to_string(input)?;
    let doc: MeshDoc = serde_json::from_str(&json)?;

    let mesh = doc.build()?;
    println!(
        "  Built {}: {} vertices, {} triangles, {} materials",
        mesh.name,
        mesh.vertex_count(),
        mesh.triangle_count(),
        mesh.materials.len()
    );

    let export = export_f3d(&mesh)?;
    fs::write(output, &export.source)?;
    println!(
        "Exported {} ({} bytes) to {:?}",
        export.dl_name,
        export.source.len(),
        output
    );

    Ok(())
}

fn export_collision_doc(
    input: &PathBuf,
    output: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading collision document from {:?}...", input);
    let json = fs::read_to_string(input)?;
    let doc: CollisionDoc = serde_json::from_str(&json)?;

    let mesh = doc.build()?;
    println!(
        "  Built collision mesh: {} vertices, {} polys, {} surface types",
        mesh.vertices.len(),
        mesh.triangles.len(),
        mesh.materials.len()
    );

    let names = CollisionNames {
        vtx_list: &doc.vtx_list,
        poly_list: &doc.poly_list,
        surface_types: &doc.surface_types,
    };
    let export = export_collision(&mesh, &names)?;
    fs::write(output, &export.source)?;
    println!(
        "Exported collision ({} bytes) to {:?}",
        export.source.len(),
        output
    );
    println!(
        "  Bounds: ({}, {}, {}) to ({}, {}, {})",
        export.bounds.min[0],
        export.bounds.min[1],
        export.bounds.min[2],
        export.bounds.max[0],
        export.bounds.max[1],
        export.bounds.max[2]
    );

    Ok(())
}
