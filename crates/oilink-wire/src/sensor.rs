/// Identifier for a logical sensor packet.
///
/// Kept as an open newtype rather than a closed enum: stream frames carry
/// packet ids as raw bytes, and an id the registry does not know about must
/// surface as [`WireError::UnknownSensor`](crate::WireError::UnknownSensor),
/// not be unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SensorCode(pub u8);

impl SensorCode {
    /// Group packet: ids 7–26 (26 bytes).
    pub const GROUP_0: SensorCode = SensorCode(0);
    /// Group packet: ids 7–16 (10 bytes).
    pub const GROUP_1: SensorCode = SensorCode(1);
    /// Group packet: ids 17–20 (6 bytes).
    pub const GROUP_2: SensorCode = SensorCode(2);
    /// Group packet: ids 21–26 (10 bytes).
    pub const GROUP_3: SensorCode = SensorCode(3);
    /// Group packet: ids 27–34 (14 bytes).
    pub const GROUP_4: SensorCode = SensorCode(4);
    /// Group packet: ids 35–42 (12 bytes).
    pub const GROUP_5: SensorCode = SensorCode(5);
    /// Group packet: ids 7–42 (52 bytes).
    pub const GROUP_6: SensorCode = SensorCode(6);

    /// Bumper and wheel-drop states as individual bits.
    pub const BUMPS_WHEEL_DROPS: SensorCode = SensorCode(7);
    /// Wall seen (0/1).
    pub const WALL: SensorCode = SensorCode(8);
    pub const CLIFF_LEFT: SensorCode = SensorCode(9);
    pub const CLIFF_FRONT_LEFT: SensorCode = SensorCode(10);
    pub const CLIFF_FRONT_RIGHT: SensorCode = SensorCode(11);
    pub const CLIFF_RIGHT: SensorCode = SensorCode(12);
    pub const VIRTUAL_WALL: SensorCode = SensorCode(13);
    /// Wheel overcurrent flags as individual bits.
    pub const WHEEL_OVERCURRENT: SensorCode = SensorCode(14);
    pub const DIRT_DETECT: SensorCode = SensorCode(15);
    /// Unassigned in the protocol, but reserved with a 1-byte payload.
    pub const UNUSED_16: SensorCode = SensorCode(16);
    /// IR character seen by the omnidirectional receiver (0 = none).
    pub const IR_OMNI: SensorCode = SensorCode(17);
    pub const BUTTONS: SensorCode = SensorCode(18);
    /// Distance travelled since last request, signed mm.
    pub const DISTANCE: SensorCode = SensorCode(19);
    /// Angle turned since last request, signed degrees.
    pub const ANGLE: SensorCode = SensorCode(20);
    /// Charging state, 0–5.
    pub const CHARGING: SensorCode = SensorCode(21);
    /// Battery voltage in mV.
    pub const VOLTAGE: SensorCode = SensorCode(22);
    /// Battery current in mA, negative while discharging.
    pub const CURRENT: SensorCode = SensorCode(23);
    /// Battery temperature in °C.
    pub const TEMPERATURE: SensorCode = SensorCode(24);
    /// Battery charge in mAh.
    pub const BATTERY_CHARGE: SensorCode = SensorCode(25);
    /// Estimated battery capacity in mAh.
    pub const BATTERY_CAPACITY: SensorCode = SensorCode(26);
    /// Wall signal strength, 0–1023.
    pub const WALL_SIGNAL: SensorCode = SensorCode(27);
    pub const CLIFF_LEFT_SIGNAL: SensorCode = SensorCode(28);
    pub const CLIFF_FRONT_LEFT_SIGNAL: SensorCode = SensorCode(29);
    pub const CLIFF_FRONT_RIGHT_SIGNAL: SensorCode = SensorCode(30);
    pub const CLIFF_RIGHT_SIGNAL: SensorCode = SensorCode(31);
    pub const DIGITAL_INPUTS: SensorCode = SensorCode(32);
    pub const ANALOG_INPUT: SensorCode = SensorCode(33);
    /// Home-base and internal-charger connection bits.
    pub const CHARGING_SOURCE: SensorCode = SensorCode(34);
    /// Current interface mode: 0 off, 1 passive, 2 safe, 3 full.
    pub const OI_MODE: SensorCode = SensorCode(35);
    pub const SONG_NUMBER: SensorCode = SensorCode(36);
    pub const SONG_PLAYING: SensorCode = SensorCode(37);
    pub const NUM_STREAM_PACKETS: SensorCode = SensorCode(38);
    /// Velocity most recently requested with a drive command.
    pub const REQUESTED_VELOCITY: SensorCode = SensorCode(39);
    /// Radius most recently requested with a drive command.
    pub const REQUESTED_RADIUS: SensorCode = SensorCode(40);
    pub const RIGHT_VELOCITY: SensorCode = SensorCode(41);
    pub const LEFT_VELOCITY: SensorCode = SensorCode(42);
}

impl From<SensorCode> for u8 {
    fn from(code: SensorCode) -> u8 {
        code.0
    }
}

impl From<u8> for SensorCode {
    fn from(raw: u8) -> SensorCode {
        SensorCode(raw)
    }
}

impl std::fmt::Display for SensorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered payload length in bytes for a sensor packet id.
///
/// The single source of truth for how much data to read per packet, fixed at
/// compile time. Returns `None` for ids the protocol does not define;
/// requesting one of those is a contract violation, not a wire condition.
pub fn packet_len(code: SensorCode) -> Option<u8> {
    let len = match code.0 {
        // Group packets bundle several individual packets into one payload.
        0 => 26,
        1 => 10,
        2 => 6,
        3 => 10,
        4 => 14,
        5 => 12,
        6 => 52,
        7..=18 | 21 | 24 | 32 | 34..=38 => 1,
        19 | 20 | 22 | 23 | 25..=31 | 33 | 39..=42 => 2,
        _ => return None,
    };
    Some(len)
}
