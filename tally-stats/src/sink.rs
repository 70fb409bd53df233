use opentelemetry::metrics::{Gauge, Meter};

/// The gauges published by each collection pass.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StatGauge {
    Guilds,
    Channels,
    MembersTotal,
    MembersOnline,
    SystemCount,
    MemberCount,
    SwitchCount,
    MessageCount,
}

impl StatGauge {
    pub const ALL: [StatGauge; 8] = [
        StatGauge::Guilds,
        StatGauge::Channels,
        StatGauge::MembersTotal,
        StatGauge::MembersOnline,
        StatGauge::SystemCount,
        StatGauge::MemberCount,
        StatGauge::SwitchCount,
        StatGauge::MessageCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Guilds => "bot.guilds",
            Self::Channels => "bot.channels",
            Self::MembersTotal => "bot.members.total",
            Self::MembersOnline => "bot.members.online",
            Self::SystemCount => "store.systems",
            Self::MemberCount => "store.members",
            Self::SwitchCount => "store.switches",
            Self::MessageCount => "store.messages",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Guilds => "Guilds in the gateway cache",
            Self::Channels => "Text channels across cached guilds",
            Self::MembersTotal => "Distinct users across cached guilds",
            Self::MembersOnline => "Distinct online users across cached guilds",
            Self::SystemCount => "Stored systems",
            Self::MemberCount => "Stored members",
            Self::SwitchCount => "Stored switches",
            Self::MessageCount => "Stored proxied messages",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Destination for gauge updates. Writes are fire-and-forget.
pub trait MetricsSink {
    fn set_gauge(&self, gauge: StatGauge, value: u64);
}

/// Sink backed by OpenTelemetry `u64` gauges.
#[derive(Clone)]
pub struct OtelMetricsSink {
    gauges: [Gauge<u64>; 8],
}

impl OtelMetricsSink {
    pub fn new(meter: &Meter) -> Self {
        Self {
            gauges: StatGauge::ALL.map(|gauge| {
                meter
                    .u64_gauge(gauge.name())
                    .with_description(gauge.description())
                    .build()
            }),
        }
    }
}

impl MetricsSink for OtelMetricsSink {
    fn set_gauge(&self, gauge: StatGauge, value: u64) {
        self.gauges[gauge.index()].record(value, &[]);
    }
}
