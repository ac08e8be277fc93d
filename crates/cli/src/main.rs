//! gloryctl CLI: command-line configuration tool for Glorious mice.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gloryctl_core::comm::ErrorClass;
use gloryctl_core::device::{DeviceRegistry, SupportedMouse};
use gloryctl_core::transport::FeatureTransport;
use gloryctl_core::{protocol, safety, MouseConfig, Rgb8, RgbEffect};
use tracing::debug;

struct CliHidTransport {
    device: hidapi::HidDevice,
}

impl CliHidTransport {
    fn open_first_supported(registry: &DeviceRegistry) -> Result<Self> {
        let api = hidapi::HidApi::new().map_err(|e| anyhow::anyhow!("hidapi init: {e}"))?;
        let first = gloryctl_core::device::find_first(&api, registry)?;
        debug!(name = %first.name, path = %first.path, "Opening device");

        let path = std::ffi::CString::new(first.path.clone())
            .context("device path contains a NUL byte")?;
        let device = api.open_path(&path).map_err(|e| {
            anyhow::anyhow!(
                "open HID device {} (VID=0x{:04X} PID=0x{:04X}): {e}",
                first.name,
                first.vid,
                first.pid
            )
        })?;

        Ok(Self { device })
    }
}

fn hid_error(op: &str, e: hidapi::HidError) -> gloryctl_core::Error {
    let msg = format!("{op}: {e}");
    if msg.to_lowercase().contains("permission") {
        gloryctl_core::Error::PermissionDenied(msg)
    } else {
        gloryctl_core::Error::Hid(msg)
    }
}

impl FeatureTransport for CliHidTransport {
    fn send_feature_report(&self, data: &[u8]) -> gloryctl_core::Result<usize> {
        self.device
            .send_feature_report(data)
            .map_err(|e| hid_error("send_feature_report", e))?;
        Ok(data.len())
    }

    fn get_feature_report(&self, buf: &mut [u8]) -> gloryctl_core::Result<usize> {
        self.device
            .get_feature_report(buf)
            .map_err(|e| hid_error("get_feature_report", e))
    }
}

fn parse_hex_u16(s: &str) -> std::result::Result<u16, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex id '{s}': {e}"))
}

fn parse_on_off(s: &str) -> std::result::Result<bool, String> {
    match s.to_lowercase().as_str() {
        "on" | "true" | "1" | "enable" => Ok(true),
        "off" | "false" | "0" | "disable" => Ok(false),
        _ => Err(format!("expected on/off, got '{s}'")),
    }
}

#[derive(Parser)]
#[command(
    name = "gloryctl",
    version,
    about = "Configure Glorious mice (DPI, RGB, debounce, liftoff)",
    after_help = safety::WRITE_DISCLAIMER
)]
struct Cli {
    /// Extra vendor id to accept, in hex (requires --pid).
    #[arg(long, value_parser = parse_hex_u16, requires = "pid", global = true)]
    vid: Option<u16>,
    /// Extra product id to accept, in hex (requires --vid).
    #[arg(long, value_parser = parse_hex_u16, requires = "vid", global = true)]
    pid: Option<u16>,
    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected supported mice.
    ListDevices,
    /// Show firmware version and debounce time.
    Info,
    /// Print the current onboard configuration.
    Dump {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Set the DPI of a profile (200-25600, steps of 100).
    SetDpi {
        /// Profile (1-6).
        profile: u8,
        /// DPI value.
        dpi: u32,
    },
    /// Select the active DPI profile.
    SetActiveDpi {
        /// Profile (1-6).
        profile: u8,
    },
    /// Enable or disable a DPI profile.
    EnableDpi {
        /// Profile (1-6).
        profile: u8,
        /// on or off.
        #[arg(value_parser = parse_on_off)]
        state: bool,
    },
    /// Select the lighting effect.
    SetEffect {
        /// off, glorious, single, breathing, breathing7, breathing1, tail, rave, wave.
        name: String,
    },
    /// Set brightness of the current effect (0-4).
    SetBrightness { level: u8 },
    /// Set animation speed of the current effect (0-3).
    SetSpeed { level: u8 },
    /// Set the colors of an effect (single, breathing1: 1; rave: 2; breathing7: 1-7).
    SetColor {
        /// Effect name.
        effect: String,
        /// Colors as rrggbb.
        #[arg(required = true)]
        colors: Vec<Rgb8>,
    },
    /// Set the color shown for a DPI profile.
    SetDpiColor {
        /// Profile (1-6).
        profile: u8,
        /// Color as rrggbb.
        color: Rgb8,
    },
    /// Set the debounce time in ms (0-510, stored in 2ms steps).
    SetDebounce { ms: u16 },
    /// Set the raw liftoff distance byte.
    SetLiftoff { distance: u8 },
}

fn print_config(cfg: &MouseConfig) {
    println!("DPI profiles (active {}/{}):", cfg.active_profile(), cfg.profile_count());
    for profile in 1..=safety::PROFILE_MAX {
        let (Ok(dpi), Ok(enabled), Ok(color)) = (
            cfg.dpi(profile),
            cfg.dpi_enabled(profile),
            cfg.dpi_color(profile),
        ) else {
            continue;
        };
        let marker = if profile == cfg.active_profile() { '*' } else { ' ' };
        println!(
            " {marker}{profile}: {dpi:>5} DPI  {}  {color}",
            if enabled { "enabled " } else { "disabled" }
        );
    }

    match cfg.effect() {
        Some(effect) => {
            print!("Effect: {effect}");
            if let Ok(mode) = cfg.get_mode(effect) {
                print!(" (brightness {}, speed {})", mode.brightness, mode.speed);
            }
            println!();
        }
        None => println!("Effect: unknown (0x{:02X})", cfg.effect_id()),
    }
    println!("  Single color: {}", cfg.single_color());
    println!("  Single color breathing: {}", cfg.breathing1_color());
    let b7: Vec<String> = cfg.breathing7_colors().iter().map(Rgb8::to_string).collect();
    println!("  Seven-color breathing: [{}]", b7.join(", "));
    let [rave_a, rave_b] = cfg.rave_colors();
    println!("  Two-color rave: {rave_a}, {rave_b}");
    println!("Liftoff distance: {}", cfg.liftoff_distance());
}

/// Read the config, apply `edit`, write it back.
fn update_config(
    transport: &dyn FeatureTransport,
    edit: impl FnOnce(&mut MouseConfig) -> gloryctl_core::Result<()>,
) -> Result<()> {
    let mut cfg = protocol::read_config(transport).context("read config")?;
    edit(&mut cfg)?;
    protocol::write_config(transport, &mut cfg).context("write config")?;
    println!("Successfully updated configuration");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut registry = DeviceRegistry::default();
    if let (Some(vid), Some(pid)) = (cli.vid, cli.pid) {
        registry = registry.with(SupportedMouse::new(vid, pid, "User-specified device"));
    }

    match cli.command {
        Commands::ListDevices => {
            let api = hidapi::HidApi::new().map_err(|e| anyhow::anyhow!("hidapi init: {e}"))?;
            let devices = gloryctl_core::device::discover_devices(&api, &registry)?;
            if devices.is_empty() {
                println!("No supported mice found.");
                println!("Ensure your mouse is connected and udev rules are set up.");
            } else {
                for dev in &devices {
                    println!(
                        "{} (VID: 0x{:04X}, PID: 0x{:04X}, path: {})",
                        dev.name, dev.vid, dev.pid, dev.path
                    );
                }
            }
        }
        Commands::Info => {
            let transport = CliHidTransport::open_first_supported(&registry)?;
            let version = protocol::read_firmware_version(&transport)
                .context("read firmware version")?;
            let debounce = protocol::read_debounce(&transport).context("read debounce")?;
            println!("Firmware version: {version}");
            println!("Debounce time: {debounce}ms");
        }
        Commands::Dump { json } => {
            let transport = CliHidTransport::open_first_supported(&registry)?;
            let cfg = protocol::read_config(&transport).context("read config")?;
            if json {
                println!("{}", cfg.to_json_pretty()?);
            } else {
                print_config(&cfg);
            }
        }
        Commands::SetDpi { profile, dpi } => {
            safety::validate_profile(profile)?;
            safety::dpi_to_raw(dpi)?;
            let transport = CliHidTransport::open_first_supported(&registry)?;
            update_config(&transport, |cfg| cfg.set_dpi(profile, dpi))?;
        }
        Commands::SetActiveDpi { profile } => {
            safety::validate_profile(profile)?;
            let transport = CliHidTransport::open_first_supported(&registry)?;
            update_config(&transport, |cfg| cfg.set_active_profile(profile))?;
        }
        Commands::EnableDpi { profile, state } => {
            safety::validate_profile(profile)?;
            let transport = CliHidTransport::open_first_supported(&registry)?;
            update_config(&transport, |cfg| cfg.set_dpi_enabled(profile, state))?;
        }
        Commands::SetEffect { name } => {
            let effect = RgbEffect::from_name(&name)?;
            let transport = CliHidTransport::open_first_supported(&registry)?;
            update_config(&transport, |cfg| {
                cfg.set_effect(effect);
                Ok(())
            })?;
        }
        Commands::SetBrightness { level } => {
            safety::validate_brightness(level)?;
            let transport = CliHidTransport::open_first_supported(&registry)?;
            update_config(&transport, |cfg| cfg.set_brightness(level))?;
        }
        Commands::SetSpeed { level } => {
            safety::validate_speed(level)?;
            let transport = CliHidTransport::open_first_supported(&registry)?;
            update_config(&transport, |cfg| cfg.set_speed(level))?;
        }
        Commands::SetColor { effect, colors } => {
            let effect = RgbEffect::from_name(&effect)?;
            let transport = CliHidTransport::open_first_supported(&registry)?;
            update_config(&transport, |cfg| cfg.set_effect_colors(effect, &colors))?;
        }
        Commands::SetDpiColor { profile, color } => {
            safety::validate_profile(profile)?;
            let transport = CliHidTransport::open_first_supported(&registry)?;
            update_config(&transport, |cfg| cfg.set_dpi_color(profile, color))?;
        }
        Commands::SetDebounce { ms } => {
            safety::validate_debounce(ms)?;
            let transport = CliHidTransport::open_first_supported(&registry)?;
            let stored = protocol::write_debounce(&transport, ms).context("write debounce")?;
            println!("Debounce time set to {stored}ms");
        }
        Commands::SetLiftoff { distance } => {
            let transport = CliHidTransport::open_first_supported(&registry)?;
            update_config(&transport, |cfg| {
                cfg.set_liftoff_distance(distance);
                Ok(())
            })?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    run(cli).inspect_err(|e| {
        if let Some(core) = e.downcast_ref::<gloryctl_core::Error>() {
            eprintln!("hint: {}", ErrorClass::classify(core).hint());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_ids() {
        assert_eq!(parse_hex_u16("258a").unwrap(), 0x258A);
        assert_eq!(parse_hex_u16("0x0036").unwrap(), 0x0036);
        assert!(parse_hex_u16("zz").is_err());
    }

    #[test]
    fn parse_on_off_variants() {
        assert!(parse_on_off("ON").unwrap());
        assert!(!parse_on_off("off").unwrap());
        assert!(parse_on_off("maybe").is_err());
    }

    #[test]
    fn set_color_parses_hex_colors() {
        let cli = Cli::try_parse_from(["gloryctl", "set-color", "rave", "ff0000", "#0000ff"]).unwrap();
        match cli.command {
            Commands::SetColor { effect, colors } => {
                assert_eq!(effect, "rave");
                assert_eq!(colors, vec![Rgb8::new(0xFF, 0, 0), Rgb8::new(0, 0, 0xFF)]);
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn vid_requires_pid() {
        assert!(Cli::try_parse_from(["gloryctl", "--vid", "258a", "info"]).is_err());
        let cli = Cli::try_parse_from(["gloryctl", "--vid", "258a", "--pid", "36", "info"]).unwrap();
        assert_eq!((cli.vid, cli.pid), (Some(0x258A), Some(0x36)));
    }
}
