//! Iridium L-band channel plan, used only to annotate statistics and CSV rows.
//! Source: https://www.sigidwiki.com/wiki/Iridium

use std::sync::OnceLock;

const KHZ: f64 = 1_000.0;
const MHZ: f64 = KHZ * 1_000.0;

/// Channel spacing is 41.667 kHz; lookups accept half of it either side.
pub const CHANNEL_TOLERANCE_HZ: f64 = 20.833 * KHZ;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelClass {
    Guard,
    Messaging,
    RingAlert,
    Duplex,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChannelInfo {
    pub description: String,
    pub class: ChannelClass,
    pub frequency_hz: f64,
}

const SIMPLEX: [(&str, ChannelClass, f64); 12] = [
    ("Guard Channel", ChannelClass::Guard, 1626.020833),
    ("Guard Channel", ChannelClass::Guard, 1626.062500),
    ("Quaternary Messaging", ChannelClass::Messaging, 1626.104167),
    ("Tertiary Messaging", ChannelClass::Messaging, 1626.145833),
    ("Guard Channel", ChannelClass::Guard, 1626.187500),
    ("Guard Channel", ChannelClass::Guard, 1626.229167),
    ("Ring Alert", ChannelClass::RingAlert, 1626.270833),
    ("Guard Channel", ChannelClass::Guard, 1626.312500),
    ("Guard Channel", ChannelClass::Guard, 1626.354167),
    ("Secondary Messaging", ChannelClass::Messaging, 1626.395833),
    ("Primary Messaging", ChannelClass::Messaging, 1626.437500),
    ("Guard Channel", ChannelClass::Guard, 1626.479167),
];

/// Simplex channels followed by duplex channels 1..=239, sorted by frequency.
pub fn catalog() -> &'static [ChannelInfo] {
    static CATALOG: OnceLock<Vec<ChannelInfo>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let mut all: Vec<ChannelInfo> = SIMPLEX
            .iter()
            .map(|(d, class, mhz)| ChannelInfo {
                description: d.to_string(),
                class: *class,
                frequency_hz: mhz * MHZ,
            })
            .collect();
        all.extend((1..240u32).map(|n| ChannelInfo {
            description: format!("Channel {}", n),
            class: ChannelClass::Duplex,
            frequency_hz: (1616.0 + 0.020833 * f64::from(2 * n - 1)) * MHZ,
        }));
        all.sort_by(|a, b| a.frequency_hz.total_cmp(&b.frequency_hz));
        all
    })
}

/// Closest catalog channel within [`CHANNEL_TOLERANCE_HZ`].
pub fn nearest_channel(frequency_hz: u64) -> Option<&'static ChannelInfo> {
    let f = frequency_hz as f64;
    catalog()
        .iter()
        .map(|c| (c, (c.frequency_hz - f).abs()))
        .filter(|(_, d)| *d <= CHANNEL_TOLERANCE_HZ)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}
