//! A small walk through a desktop session.
//!
//! This sets up the desktop area of a 1080p screen with a panel along the
//! bottom, loads a few plugins and launchers onto it, and then makes the
//! screen smaller and the icons bigger to show items being moved around.
//! Every event the desktop emits is printed as it happens.

use std::error::Error;

use lumidesk::config::{DeskConfig, store::MemoryStore};
use lumidesk::desktop::{work_area, PanelEdge, PanelStrip, PluginSpace, SpaceEvent};
use lumidesk::types::{Orientation, PixelRect};

use tracing::Level;
use tracing_subscriber::{fmt as logger, fmt::format::FmtSpan};

fn print_events(stage: &str, events: &[SpaceEvent]) {
    println!("== {stage}");
    for event in events {
        match event {
            SpaceEvent::Placed { id, grid, geometry } => {
                println!("placed  {id:<45} grid {grid} px {geometry:?}")
            }
            SpaceEvent::Moved { id, grid, geometry } => {
                println!("moved   {id:<45} grid {grid} px {geometry:?}")
            }
            SpaceEvent::Dropped { id } => println!("dropped {id}"),
            SpaceEvent::Removed { id } => println!("removed {id}"),
        }
    }
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    logger::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_max_level(Level::DEBUG)
        .without_time()
        .try_init()?;

    let config = DeskConfig::builder()
        .orientation(Orientation::TopToBottom)
        .finish(|_| Ok(()))?;

    let mut store = MemoryStore::new();
    // left over from an earlier session
    store.insert_raw("calendar---desktop1", "12,0,4,3");

    let screen = PixelRect::new(0, 0, 1920, 1080);
    let panels = [PanelStrip::new(PanelEdge::Bottom, 40)];

    let mut space = PluginSpace::new(config, store, 0, work_area(screen, &panels))?;

    let plugins: Vec<String> = ["calendar---desktop1", "notepad---desktop1", "rssreader---desktop1"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let files: Vec<String> = (1..=12)
        .map(|i| format!("/home/user/Desktop/file{i}.txt"))
        .collect();

    print_events("load", &space.load_items(&plugins, &files));

    let panels = [
        PanelStrip::new(PanelEdge::Bottom, 40),
        PanelStrip::new(PanelEdge::Left, 1200),
    ];
    space.set_desktop_area(work_area(screen, &panels));
    print_events("shrink", &space.update_geom());

    print_events("bigger icons", &space.increase_icons()?);

    if let Some(event) = space.remove_item("notepad---desktop1") {
        print_events("remove", &[event]);
    }

    println!("{} items on the desktop", space.packer().len());

    Ok(())
}
