//! Utility functions shared by the finder and the CLI

pub mod path;

/// Format file size in human-readable format
///
/// SI units; one decimal below 10, none from 10 up (`1.5 kB`, `15 kB`).
pub fn format_file_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "kB", "MB", "GB", "TB"];
    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= 1000.0 && unit_index < UNITS.len() - 1 {
        size /= 1000.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        return format!("{:.0} {}", size, UNITS[unit_index]);
    }

    let rounded = (size * 10.0 + 0.5).floor() / 10.0;
    if rounded < 10.0 {
        format!("{:.1} {}", rounded, UNITS[unit_index])
    } else {
        format!("{:.0} {}", rounded, UNITS[unit_index])
    }
}

/// Render permission bits the way `ls -l` does, e.g. `drwxr-xr-x`
pub fn mode_string(mode: u32, is_dir: bool, is_symlink: bool) -> String {
    const RWX: &[u8; 3] = b"rwx";

    let mut out = String::with_capacity(10);
    out.push(if is_symlink {
        'l'
    } else if is_dir {
        'd'
    } else {
        '-'
    });
    for bit in (0..9).rev() {
        if mode & (1 << bit) != 0 {
            out.push(RWX[(8 - bit) % 3] as char);
        } else {
            out.push('-');
        }
    }
    out
}
