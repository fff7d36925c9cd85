// FRAME_SIZE is the number of bytes in every report read from the device.
pub const FRAME_SIZE: usize = 8;

// MAGIC_KEY is the byte sequence the device mixes into every frame.
// Each byte is nibble-swapped before being subtracted from the rotated frame.
pub const MAGIC_KEY: [u8; FRAME_SIZE] = *b"Htemp99e";

// OPCODE_TEMPERATURE marks a frame carrying the ambient temperature in 1/16 K.
pub const OPCODE_TEMPERATURE: u8 = 0x42;

// OPCODE_CO2 marks a frame carrying the CO2 concentration in ppm.
pub const OPCODE_CO2: u8 = 0x50;

// VENDOR_ID and PRODUCT_ID identify the monitor on the USB bus.
pub const VENDOR_ID: u16 = 0x04d9;
pub const PRODUCT_ID: u16 = 0xa052;

// DEFAULT_TIMEOUT_SECS bounds a collection session.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// DEFAULT_TOPIC is the base topic readings are published under.
pub const DEFAULT_TOPIC: &str = "dadget/room";

// DEFAULT_CLIENT_ID is the client identifier presented to the broker.
pub const DEFAULT_CLIENT_ID: &str = "co2mon-sender";

// MAX_TOPIC_LEN bounds the full topic of a published value.
pub const MAX_TOPIC_LEN: usize = 128;
