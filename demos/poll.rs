use std::time::Duration;

use rawpoint::backends::probe_devices;
use rawpoint::logging::init_logging;
use rawpoint::{Config, EventFilter, JsonLinesSink, LoggingSink, SinkBus};

fn main() -> rawpoint::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "rawpoint.toml".to_string());
    let config = Config::load(&path)?;
    init_logging(&config.logging)?;

    let mut devices = probe_devices(config.scaling);
    eprintln!("Discovered {} HID pointer(s)", devices.len());
    for d in &devices {
        eprintln!("== {} ({}) == {}", d.name(), d.id(), d.metadata());
    }

    let mut bus = SinkBus::new();
    bus.add_sink(LoggingSink::new(), EventFilter::All);
    bus.add_sink(JsonLinesSink::new(std::io::stdout()), EventFilter::PointerOnly);

    while !devices.is_empty() {
        devices.retain_mut(|d| match d.poll(&mut bus) {
            Ok(_) => true,
            Err(e) => {
                eprintln!("{}: dropped ({e})", d.id());
                false
            }
        });

        // Keep CPU usage sane
        std::thread::sleep(Duration::from_millis(2));
    }
    Ok(())
}
