use std::env;
use std::path::PathBuf;
use tokio::sync::watch;
use vigil_base::log_fatal;
use vigil_sensor::{SensorConfig, SimSensor};
use vigil_watch::{RecordingConfig, WatchConfig, Watcher};

fn usage() -> ! {
    eprintln!(
        "Usage: vigil-watch [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --events <addr>     event broadcast address (default 127.0.0.1:5555)\n\
         \x20 --commands <addr>   command channel address (default 127.0.0.1:5556)\n\
         \x20 --cutoff <n>        initial per-triplet noise floor (default 50)\n\
         \x20 --threshold <n>     movement score needed to emit an event (default 10)\n\
         \x20 --snapshot <path>   where write_bmp snapshots land (default snapshot.bmp)\n\
         \x20 --record <path>     record the raw stream through ffmpeg to <path>\n\
         \x20 --fps <n>           sensor frame rate (default 30)"
    );
    std::process::exit(2);
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> String {
    match args.next() {
        Some(value) => value,
        None => {
            eprintln!("Missing value for {flag}");
            usage();
        }
    }
}

fn parse_number(value: &str, flag: &str) -> i64 {
    match value.parse() {
        Ok(number) => number,
        Err(_) => {
            eprintln!("Value for {flag} is not a number: {value}");
            usage();
        }
    }
}

fn parse_args() -> (WatchConfig, SensorConfig) {
    let mut config = WatchConfig::default();
    let mut sensor = SensorConfig::default();
    let mut record_output: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--events" => config = config.with_event_addr(next_value(&mut args, "--events")),
            "--commands" => config = config.with_command_addr(next_value(&mut args, "--commands")),
            "--cutoff" => {
                let value = next_value(&mut args, "--cutoff");
                config = config.with_cutoff(parse_number(&value, "--cutoff"));
            }
            "--threshold" => {
                let value = next_value(&mut args, "--threshold");
                config = config.with_threshold(parse_number(&value, "--threshold"));
            }
            "--snapshot" => {
                config = config.with_snapshot_path(PathBuf::from(next_value(&mut args, "--snapshot")));
            }
            "--record" => record_output = Some(PathBuf::from(next_value(&mut args, "--record"))),
            "--fps" => {
                let value = next_value(&mut args, "--fps");
                sensor = sensor.with_fps(parse_number(&value, "--fps").max(1) as u32);
            }
            "--help" | "-h" => usage(),
            _ => {
                eprintln!("Unknown option: {arg}");
                usage();
            }
        }
    }

    if let Some(output) = record_output {
        config = config.with_recording(
            RecordingConfig::default()
                .with_output(output)
                .with_width(sensor.width())
                .with_height(sensor.height()),
        );
    }

    (config, sensor)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    vigil_base::init_stdout_logger();

    let (config, sensor_config) = parse_args();
    let sensor = SimSensor::new(sensor_config);

    let mut watcher = match Watcher::bind(&config, sensor).await {
        Ok(watcher) => watcher,
        Err(e) => log_fatal!("Startup failed: {}", e),
    };

    log::info!(
        "Events on {}, commands on {}",
        watcher.event_addr(),
        watcher.command_addr()
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    watcher.run(shutdown_rx).await?;
    log::info!("Stopped");

    Ok(())
}
