use rawpoint::backends::virtual_input::VirtualPointer;
use rawpoint::logging::init_logging;
use rawpoint::{Config, Device, EventFilter, JsonLinesSink, LoggingSink, SinkBus};

fn main() -> rawpoint::Result<()> {
    // Optional config file as the first argument; a missing file means defaults.
    let path = std::env::args().nth(1).unwrap_or_else(|| "rawpoint.toml".to_string());
    let config = Config::load(&path)?;
    init_logging(&config.logging)?;

    let mut pointer = VirtualPointer::new("virtual:demo", "Demo Virtual Pointer", config.scaling)?;

    // Drag right and up with button 1 held, then one wheel detent.
    pointer.press(1);
    pointer.move_by(12, -4);
    pointer.scroll(1);
    pointer.release(1);

    let mut bus = SinkBus::new();
    bus.add_sink(LoggingSink::new(), EventFilter::All);
    bus.add_sink(JsonLinesSink::new(std::io::stdout()), EventFilter::All);

    let handled = pointer.poll(&mut bus)?;
    eprintln!("(Virtual) {} report(s) handled, buttons now {}", handled, pointer.buttons());
    Ok(())
}
