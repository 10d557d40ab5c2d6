use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use labelfit::render::{PlottersFont, register_font_file, render_to_file};
use labelfit::{
    EstimatedFont, Font, HAlign, LabelConfig, LineLayout, MultiLineTextLabel, Rect, TextLabel,
    TruncateMode, View,
};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(
    name = "labelfit",
    version,
    about = "Truncate, wrap and render label text to fit a fixed width"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the lines (or the truncated text) and print them.
    Layout(LayoutArgs),
    /// Draw the label into an SVG or PNG file.
    Render(RenderArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Clip,
    Truncate,
    Wrap,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TruncateArg {
    None,
    Head,
    Tail,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AlignArg {
    Left,
    Center,
    Right,
}

#[derive(Args, Debug)]
struct LabelArgs {
    /// Label text; `\n` separates paragraphs.
    #[arg(short, long, conflicts_with = "input")]
    text: Option<String>,
    /// Read the label text from a file (must be UTF-8).
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// JSON config file (defaults to <config dir>/labelfit/config.json when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// View width.
    #[arg(short, long)]
    width: Option<f64>,
    /// View height.
    #[arg(long)]
    height: Option<f64>,
    /// Multi-line layout.
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
    /// Lay out a single truncated line instead of multiple lines.
    #[arg(long, default_value_t = false)]
    single_line: bool,
    /// Truncation for --single-line.
    #[arg(long, value_enum)]
    truncate: Option<TruncateArg>,
    /// Grow or shrink the view height to the number of lines.
    #[arg(long, default_value_t = false)]
    auto_height: bool,
    #[arg(long, value_enum)]
    align: Option<AlignArg>,
    /// Font family name.
    #[arg(long)]
    family: Option<String>,
    #[arg(long)]
    font_size: Option<f64>,
    /// TrueType/OpenType file to measure and draw with. Without it, widths are estimated.
    #[arg(long)]
    font_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    label: LabelArgs,
    /// Print JSON instead of tab-separated lines.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    label: LabelArgs,
    /// Output image (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Render(args) => cmd_render(args),
    }
}

/// Config file (or discovered defaults) with command-line overrides applied.
fn resolve_config(args: &LabelArgs) -> Result<LabelConfig> {
    let mut cfg = match &args.config {
        Some(path) => LabelConfig::load(path)?,
        None => LabelConfig::discover()?,
    };
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    if let Some(layout) = args.layout {
        cfg.policy.line_layout = match layout {
            LayoutArg::Clip => LineLayout::Clip,
            LayoutArg::Truncate => LineLayout::Truncate,
            LayoutArg::Wrap => LineLayout::Wrap,
        };
    }
    if let Some(mode) = args.truncate {
        cfg.policy.truncate_mode = match mode {
            TruncateArg::None => TruncateMode::None,
            TruncateArg::Head => TruncateMode::Head,
            TruncateArg::Tail => TruncateMode::Tail,
        };
    }
    if args.auto_height {
        cfg.policy.auto_height = true;
    }
    if let Some(align) = args.align {
        cfg.style.align = match align {
            AlignArg::Left => HAlign::Left,
            AlignArg::Center => HAlign::Center,
            AlignArg::Right => HAlign::Right,
        };
    }
    if let Some(family) = &args.family {
        cfg.font.family = family.clone();
    }
    if let Some(size) = args.font_size {
        cfg.font.size = size;
    }
    Ok(cfg)
}

fn load_font(cfg: &LabelConfig, font_file: Option<&PathBuf>) -> Result<Rc<dyn Font>> {
    match font_file {
        Some(path) => {
            register_font_file(&cfg.font.family, cfg.font.weight, path)?;
            Ok(Rc::new(PlottersFont::new(cfg.font.clone())))
        }
        None => Ok(Rc::new(EstimatedFont::new(cfg.font.clone()))),
    }
}

enum Label {
    Single(TextLabel),
    Multi(MultiLineTextLabel),
}

fn build_label(args: &LabelArgs, cfg: &LabelConfig, font: Rc<dyn Font>) -> Result<Label> {
    let view = Rect::new(0.0, 0.0, cfg.width, cfg.height);
    if args.single_line {
        let mut label = TextLabel::new(view, "", font);
        label.set_style(cfg.style.clone())?;
        label.set_truncate_mode(cfg.policy.truncate_mode)?;
        match (&args.text, &args.input) {
            (Some(text), _) => label.set_text(text.as_str())?,
            (None, Some(path)) => label.set_text_utf8(&read_input(path)?)?,
            (None, None) => anyhow::bail!("either --text or --input is required"),
        };
        return Ok(Label::Single(label));
    }

    let mut label = MultiLineTextLabel::new(view, "", font);
    label.set_style(cfg.style.clone());
    label.set_line_layout(cfg.policy.line_layout);
    label.set_auto_height(cfg.policy.auto_height);
    match (&args.text, &args.input) {
        (Some(text), _) => {
            label.set_text(text.as_str());
        }
        (None, Some(path)) => {
            label.set_text_utf8(&read_input(path)?)?;
        }
        (None, None) => anyhow::bail!("either --text or --input is required"),
    }
    label.ensure_layout()?;
    Ok(Label::Multi(label))
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn cmd_layout(args: LayoutArgs) -> Result<()> {
    let cfg = resolve_config(&args.label)?;
    let font = load_font(&cfg, args.label.font_file.as_ref())?;
    match build_label(&args.label, &cfg, font)? {
        Label::Single(mut label) => {
            if args.json {
                let truncated = label.truncated_text_checked()?.to_owned();
                let out = serde_json::json!({
                    "text": label.text(),
                    "truncated": truncated,
                    "view": label.view_size(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", label.truncated_text_checked()?);
            }
        }
        Label::Multi(label) => {
            if args.json {
                let out = serde_json::json!({
                    "lines": label.lines(),
                    "view": label.view_size(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for line in label.lines() {
                    println!("{}\t{}\t{}", line.rect.y, line.rect.width, line.text);
                }
            }
        }
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let Some(font_file) = args.label.font_file.as_ref() else {
        anyhow::bail!("render needs --font-file: the plotters text path has no system font lookup");
    };
    let cfg = resolve_config(&args.label)?;
    let font = load_font(&cfg, Some(font_file))?;
    let mut label = build_label(&args.label, &cfg, font)?;
    let view: &mut dyn View = match &mut label {
        Label::Single(l) => l,
        Label::Multi(l) => l,
    };
    let size = view.view_size();
    let (w, h) = (size.right().ceil().max(1.0) as u32, size.bottom().ceil().max(1.0) as u32);
    render_to_file(view, &args.out, w, h)?;
    eprintln!("Wrote label to {}", args.out.display());
    Ok(())
}
