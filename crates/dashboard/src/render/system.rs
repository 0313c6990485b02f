use ripdash_core::SystemSnapshot;
use ripdash_core::types::{GpuInfo, Reading};

use crate::view::{Line, Region, Tile, Tone};

const MIB: f64 = 1_048_576.0;
const GIB: f64 = 1_073_741_824.0;

/// Hardware encoder vendors in display order: (label, key in `hwenc_info.vendors`).
const ENCODERS: [(&str, &str); 3] = [
    ("AMD VCE", "vce"),
    ("Intel QSV", "qsv"),
    ("NVIDIA NVENC", "nvenc"),
];

pub fn render(region: &mut Region, snapshot: &SystemSnapshot) {
    let mut tiles = vec![
        os_tile(snapshot),
        memory_tile(snapshot),
        storage_tile(snapshot),
        cpu_tile(snapshot),
        encoder_tile(snapshot),
    ];
    tiles.extend(snapshot.gpu_info.iter().map(gpu_tile));
    region.replace(tiles);
}

fn os_tile(s: &SystemSnapshot) -> Tile {
    let os = &s.os_info;
    Tile::new("OS Info")
        .line(Line::maybe("OS", os.os.clone()))
        .line(Line::maybe("Version", os.os_version.clone()))
        .line(Line::maybe("Kernel", os.kernel.clone()))
        .line(Line::maybe("Uptime", os.uptime.clone()))
}

fn memory_tile(s: &SystemSnapshot) -> Tile {
    let mem = &s.memory_info;
    Tile::new("Memory")
        .line(Line::maybe("Total", mem.total.map(mebibytes)))
        .line(Line::maybe("Used", mem.used.map(mebibytes)))
        .line(Line::maybe("Usage", mem.percent.map(percent)))
}

fn storage_tile(s: &SystemSnapshot) -> Tile {
    let disk = &s.storage_info;
    Tile::new("Storage")
        .line(Line::maybe("Total", disk.total.map(gibibytes)))
        .line(Line::maybe("Used", disk.used.map(gibibytes)))
        .line(Line::maybe("Usage", disk.percent.map(percent)))
}

fn cpu_tile(s: &SystemSnapshot) -> Tile {
    let cpu = &s.cpu_info;
    let cores_threads = match (cpu.cores, cpu.threads) {
        (Some(c), Some(t)) => Some(format!("{c}C / {t}T")),
        _ => None,
    };
    Tile::new("CPU")
        .line(Line::maybe("Model", cpu.model.clone()))
        .line(Line::maybe("Cores", cores_threads))
        .line(Line::maybe("Clock", cpu.frequency.map(|f| format!("{f} MHz"))))
        .line(Line::maybe("Usage", cpu.usage.map(percent)))
        .line(Line::maybe("Temp", cpu.temperature.as_ref().map(celsius)))
}

fn encoder_tile(s: &SystemSnapshot) -> Tile {
    ENCODERS
        .iter()
        .fold(Tile::new("HW Encoders"), |tile, (label, key)| {
            let line = match s.hwenc_info.vendors.get(*key) {
                Some(vendor) if vendor.available => {
                    Line::field(*label, format!("✓ ({})", vendor.codecs.join(", ")))
                        .tone(Tone::Good)
                }
                _ => Line::field(*label, "✗").tone(Tone::Muted),
            };
            tile.line(line)
        })
}

fn gpu_tile(gpu: &GpuInfo) -> Tile {
    let vram = match (gpu.used_memory, gpu.total_memory, gpu.percent_memory) {
        (Some(used), Some(total), Some(pct)) => Some(format!(
            "{}MB / {}MB ({})",
            (used as f64 / MIB).round(),
            (total as f64 / MIB).round(),
            percent(pct)
        )),
        _ => None,
    };
    Tile::new("GPU Info")
        .class("gpu-tile")
        .line(Line::maybe("Model", gpu.model.clone()))
        .line(Line::maybe("Usage", gpu.usage.map(percent)))
        .line(Line::maybe("Temp", gpu.temperature.as_ref().map(celsius)))
        .line(Line::maybe("VRAM", vram))
}

fn mebibytes(bytes: u64) -> String {
    format!("{} MB", (bytes as f64 / MIB).round())
}

fn gibibytes(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / GIB)
}

fn percent(value: f64) -> String {
    format!("{value}%")
}

fn celsius(reading: &Reading) -> String {
    match reading {
        Reading::Number(n) => format!("{n}°C"),
        Reading::Text(t) => t.clone(),
    }
}
