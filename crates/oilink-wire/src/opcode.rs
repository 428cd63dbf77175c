/// Single-byte command op codes.
///
/// Every outbound command starts with one of these, optionally followed by a
/// fixed-format payload. Values 133 and 146 are unassigned in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Starts the command interface; must precede all other commands.
    Start = 128,
    Baud = 129,
    Control = 130,
    Safe = 131,
    Full = 132,
    Spot = 134,
    /// Default cleaning mode.
    Cover = 135,
    Demo = 136,
    /// Velocity/radius wheel control; payload `[velocity:i16][radius:i16]`.
    Drive = 137,
    LowSideDrivers = 138,
    Leds = 139,
    Song = 140,
    Play = 141,
    /// Request a single sensor packet; payload `[packet_id:u8]`.
    Sensors = 142,
    Dock = 143,
    PwmLowSideDrivers = 144,
    /// Per-wheel velocity control; payload `[right:i16][left:i16]`.
    DriveDirect = 145,
    DigitalOutputs = 147,
    /// Start a sensor data stream; payload `[count:u8][packet_id:u8]×count`.
    SensorStream = 148,
    /// One-shot batched sensor request; payload `[count:u8][packet_id:u8]×count`.
    QueryList = 149,
    /// Pause or resume an active stream; payload `[flag:u8]` (0 = pause).
    PauseResumeStream = 150,
    SendIr = 151,
    Script = 152,
    PlayScript = 153,
    ShowScript = 154,
    WaitTime = 155,
    WaitDistance = 156,
    WaitAngle = 157,
    WaitEvent = 158,
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}
