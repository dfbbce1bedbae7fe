use std::fs;
use std::path::{Path, PathBuf};

use report_chart::backend::{InteractiveBackend, StaticBackend};
use report_chart::core::{ChartSpec, ThemeContext, Viewport};
use report_chart::interaction::InteractionState;
use report_chart::render::frame_to_svg;

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    output: PathBuf,
    size: Viewport,
    theme: Option<ThemeContext>,
}

const USAGE: &str = "usage: report-chart-bundle <spec.json> <out.html> [--size <width>x<height>] [--theme <light|dark|theme.json>]";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("failed to read `{}`: {err}", args.input.display()))?;
    let spec = ChartSpec::from_json_compat_str(&raw).map_err(|err| err.to_string())?;
    let theme = args
        .theme
        .unwrap_or_else(|| ThemeContext::for_mode(spec.theme_mode));
    let state = InteractionState::default();

    let bundle = InteractiveBackend::default().generate(&spec, &theme, &state, None, args.size);
    bundle.write_to(&args.output).map_err(|err| {
        format!("failed to write `{}`: {err}", args.output.display())
    })?;

    let render = StaticBackend::default().render(&spec, &theme, &state, args.size);
    let svg = frame_to_svg(
        render.frame(),
        theme.tokens().background,
        &theme.typography().font_family,
    );
    let svg_path = args.output.with_extension("svg");
    fs::write(&svg_path, svg)
        .map_err(|err| format!("failed to write `{}`: {err}", svg_path.display()))?;

    println!(
        "wrote {} and {}",
        args.output.display(),
        svg_path.display()
    );
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let input = args.next().map(PathBuf::from).ok_or_else(|| USAGE.to_owned())?;
    let output = args.next().map(PathBuf::from).ok_or_else(|| USAGE.to_owned())?;
    let mut size = Viewport::new(1200, 760);
    let mut theme = None;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--size" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --size".to_owned())?;
                size = parse_size(&value)?;
            }
            "--theme" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --theme".to_owned())?;
                theme = Some(load_theme(&value)?);
            }
            _ => return Err(format!("unknown argument `{flag}`\n{USAGE}")),
        }
    }

    Ok(CliArgs {
        input,
        output,
        size,
        theme,
    })
}

fn parse_size(value: &str) -> Result<Viewport, String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("invalid size `{value}`, expected <width>x<height>"))?;
    let width = width
        .parse::<u32>()
        .map_err(|err| format!("invalid width `{width}`: {err}"))?;
    let height = height
        .parse::<u32>()
        .map_err(|err| format!("invalid height `{height}`: {err}"))?;
    let size = Viewport::new(width, height);
    if !size.is_valid() {
        return Err(format!("size must be non-zero, got `{value}`"));
    }
    Ok(size)
}

fn load_theme(value: &str) -> Result<ThemeContext, String> {
    match value {
        "light" => Ok(ThemeContext::light()),
        "dark" => Ok(ThemeContext::dark()),
        path => {
            let raw = fs::read_to_string(Path::new(path))
                .map_err(|err| format!("failed to read `{path}`: {err}"))?;
            ThemeContext::from_json_str(&raw).map_err(|err| err.to_string())
        }
    }
}
