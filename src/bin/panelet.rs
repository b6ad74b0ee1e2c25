use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "panelet", version, about = "Compose storyboard text into SVG comic panels")]
struct Cli {
    /// Storyboard document to compose.
    storyboard: PathBuf,

    /// Output directory, created (with parents) if absent.
    #[arg(default_value = panelet::DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// Print each panel's computed geometry as JSON before writing.
    #[arg(long)]
    dump_layout: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.storyboard)
        .with_context(|| format!("read storyboard '{}'", cli.storyboard.display()))?;
    let doc_dir = match cli.storyboard.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let storyboard = panelet::storyboard::parse(&text, doc_dir)?;
    let composed = panelet::compose(&storyboard)?;

    if cli.dump_layout {
        dump_layout(&composed)?;
    }

    let written =
        panelet::write_panels(&composed, &storyboard.settings.output_extension, &cli.out_dir)?;
    for path in &written {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn dump_layout(panels: &[panelet::ComposedPanel]) -> anyhow::Result<()> {
    eprintln!("layout diagnostics:");
    for panel in panels {
        let json = serde_json::to_string_pretty(&panel.geometry)
            .with_context(|| format!("serialize geometry for panel {}", panel.index))?;
        match &panel.title {
            Some(title) => eprintln!("  panel {} (\"{title}\"):", panel.index),
            None => eprintln!("  panel {}:", panel.index),
        }
        eprintln!("{json}");
    }
    Ok(())
}
