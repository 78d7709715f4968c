//! Command-line operations applied to a deck.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Subcommand;
use mapslides_core::{DrawingStyle, Gesture, Layer, LayerKind, Replay, Timeline, Tool};
use mapslides_geometry::{Haversine, LatLng};
use mapslides_session::SlideRegistry;

use crate::file_io;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List slides and the layers of the active slide
    Show,
    /// List the active slide's history
    History,
    /// Draw a layer on the active slide
    Draw {
        #[command(subcommand)]
        shape: Shape,
    },
    /// Delete the layer at INDEX
    Delete { index: usize },
    /// Toggle the pinned flag of the layer at INDEX
    Pin { index: usize },
    /// Toggle the hidden flag of the layer at INDEX
    Hide { index: usize },
    /// Move the layer at FROM to TO
    Reorder { from: usize, to: usize },
    /// Undo the last action on the active slide
    Undo,
    /// Redo the next action on the active slide
    Redo,
    /// Step through history until ENTRY is the present action (-1 for none)
    Jump {
        #[arg(allow_negative_numbers = true)]
        entry: i64,
    },
    /// Slide management
    Slide {
        #[command(subcommand)]
        action: SlideCommand,
    },
    /// Print a slide (or the whole deck) as JSON
    Export {
        /// Slide to export instead of the whole deck
        #[arg(long)]
        slide: Option<usize>,
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Import an exported slide, or replace the deck with an exported deck
    Import {
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Treat FILE as a whole deck and replace the current one
        #[arg(long)]
        replace: bool,
    },
}

/// Points are given as `LAT,LNG`
#[derive(Subcommand, Debug)]
pub enum Shape {
    /// Rectangle between two opposite corners
    Rect {
        #[arg(allow_hyphen_values = true, value_parser = parse_point)]
        from: LatLng,
        #[arg(allow_hyphen_values = true, value_parser = parse_point)]
        to: LatLng,
    },
    /// Circle around CENTER passing through EDGE
    Circle {
        #[arg(allow_hyphen_values = true, value_parser = parse_point)]
        center: LatLng,
        #[arg(allow_hyphen_values = true, value_parser = parse_point)]
        edge: LatLng,
    },
    /// Arrow from START to END
    Arrow {
        #[arg(allow_hyphen_values = true, value_parser = parse_point)]
        start: LatLng,
        #[arg(allow_hyphen_values = true, value_parser = parse_point)]
        end: LatLng,
    },
    /// Text label at POSITION
    Text {
        #[arg(allow_hyphen_values = true, value_parser = parse_point)]
        position: LatLng,
        content: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SlideCommand {
    /// Make INDEX the active slide (past the end appends a new slide)
    Switch { index: usize },
    /// Copy a slide (default: the active one) right after itself
    Duplicate { index: Option<usize> },
    /// Remove the slide at INDEX
    Remove { index: usize },
}

fn parse_point(s: &str) -> Result<LatLng, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {s:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude {lat:?}: {e}"))?;
    let lng: f64 = lng.trim().parse().map_err(|e| format!("bad longitude {lng:?}: {e}"))?;
    Ok(LatLng::new(lat, lng))
}

impl Command {
    /// Commands that leave the deck untouched
    pub fn is_read_only(&self) -> bool {
        matches!(self, Command::Show | Command::History | Command::Export { .. })
    }
}

/// Apply `command` to the deck and return the text to print
pub fn run(registry: &mut SlideRegistry, command: &Command) -> Result<String> {
    let status = match command {
        Command::Show => show(registry),
        Command::History => history(registry),
        Command::Draw { shape } => draw(registry, shape)?,
        Command::Delete { index } => match registry.delete_layer(*index) {
            Some(layer) => format!("Deleted {}", layer.title()),
            None => format!("No layer at {index}"),
        },
        Command::Pin { index } => match registry.toggle_pin(*index) {
            Some(true) => format!("Pinned layer {index}"),
            Some(false) => format!("Unpinned layer {index}"),
            None => format!("No layer at {index}"),
        },
        Command::Hide { index } => match registry.toggle_hide(*index) {
            Some(true) => format!("Hid layer {index}"),
            Some(false) => format!("Unhid layer {index}"),
            None => format!("No layer at {index}"),
        },
        Command::Reorder { from, to } => {
            if registry.reorder(*from, *to) {
                format!("Moved layer {from} to {to}")
            } else {
                "Nothing to move".to_string()
            }
        }
        Command::Undo => replayed("Undid", registry.undo(), "Nothing to undo"),
        Command::Redo => replayed("Redid", registry.redo(), "Nothing to redo"),
        Command::Jump { entry } => {
            let target = match *entry {
                -1 => None,
                e if e >= 0 => Some(e as usize),
                e => bail!("history entry must be -1 or greater, got {e}"),
            };
            let steps = registry.jump_to(target);
            format!("Stepped {steps} time(s)")
        }
        Command::Slide { action } => slide(registry, action),
        Command::Export { slide, output } => {
            let json = match slide {
                Some(index) => registry.export_slide(*index)?,
                None => registry.export_deck()?,
            };
            match output {
                Some(path) => {
                    file_io::write_text(path, &json)?;
                    format!("Exported to {}", path.display())
                }
                None => json,
            }
        }
        Command::Import { path, replace } => {
            let json = file_io::read_text(path)?;
            if *replace {
                registry.import_deck(&json)?;
                format!("Imported deck with {} slide(s)", registry.len())
            } else {
                let index = registry.import_slide(&json)?;
                format!("Imported slide {index}")
            }
        }
    };
    Ok(status)
}

fn draw(registry: &mut SlideRegistry, shape: &Shape) -> Result<String> {
    let style = registry.defaults().drawing.clone();
    let kind = match shape {
        Shape::Text { position, content } => Some(style.text(content.as_str(), *position)),
        Shape::Rect { from, to } => stroke(Tool::Rectangle, *from, *to, &style),
        Shape::Circle { center, edge } => stroke(Tool::Circle, *center, *edge, &style),
        Shape::Arrow { start, end } => stroke(Tool::Arrow, *start, *end, &style),
    };
    let Some(kind) = kind else {
        bail!("shape is empty, nothing drawn");
    };
    let id = registry.create_layer(kind, &Haversine);
    let layer = registry.inspected_layer().filter(|l| l.uuid == id);
    Ok(match layer {
        Some(layer) => format!("Drew {}", describe(registry.active().layers.len() - 1, layer)),
        None => format!("Drew {id}"),
    })
}

/// One press, drag, release sequence
fn stroke(tool: Tool, from: LatLng, to: LatLng, style: &DrawingStyle) -> Option<LayerKind> {
    let mut gesture = Gesture::new(tool);
    gesture.press(from);
    gesture.drag(to, &Haversine);
    gesture.release(to, style)
}

fn slide(registry: &mut SlideRegistry, action: &SlideCommand) -> String {
    match *action {
        SlideCommand::Switch { index } => {
            let now = registry.switch_to(index);
            format!("Slide {} of {}", now + 1, registry.len())
        }
        SlideCommand::Duplicate { index } => {
            let source = index.unwrap_or(registry.active_index());
            match registry.duplicate(source) {
                Some(copy) => format!("Copied slide {source} to {copy}"),
                None => format!("No slide at {source}"),
            }
        }
        SlideCommand::Remove { index } => {
            if registry.remove(index) {
                format!("Removed slide {index}, {} left", registry.len())
            } else {
                format!("Slide {index} can't be removed")
            }
        }
    }
}

fn replayed(verb: &str, replay: Option<Replay>, empty: &str) -> String {
    match replay {
        Some(replay) if replay.outcome.is_applied() => format!("{verb} {}", replay.action.label()),
        Some(replay) => format!("{verb} {} ({:?})", replay.action.label(), replay.outcome),
        None => empty.to_string(),
    }
}

fn describe(index: usize, layer: &Layer) -> String {
    let mut line = format!("{index}: {}", layer.title());
    if layer.is_pinned {
        line.push_str(" [pinned]");
    }
    if layer.is_hidden {
        line.push_str(" [hidden]");
    }
    if let Some(area) = layer.real_life_area {
        line.push_str(&format!(" area {area:.0} m²"));
    }
    if let Some(distance) = layer.real_life_distance {
        line.push_str(&format!(" length {distance:.0} m"));
    }
    line
}

fn show(registry: &SlideRegistry) -> String {
    let viewport = registry.viewport();
    let mut lines = vec![format!(
        "Slide {} of {} at {} zoom {}",
        registry.active_index() + 1,
        registry.len(),
        viewport.center,
        viewport.zoom
    )];
    let layers = registry.active().layers.layers();
    if layers.is_empty() {
        lines.push("  (no layers)".to_string());
    }
    for (index, layer) in layers.iter().enumerate() {
        lines.push(format!("  {}", describe(index, layer)));
    }
    lines.join("\n")
}

fn history(registry: &SlideRegistry) -> String {
    let stack = registry.active().layers.history();
    if stack.is_empty() {
        return "(no history)".to_string();
    }
    stack
        .entries()
        .map(|(index, action, timeline)| {
            let marker = match timeline {
                Timeline::Past => ' ',
                Timeline::Present => '>',
                Timeline::Future => '~',
            };
            format!("{marker} {index}: {}", action.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
