//! SIM800-style SMS modem over a UART
//!
//! Text-mode SMS via AT commands: select text mode, open a send with
//! the destination number, stream the body, terminate with Ctrl+Z. The
//! modem queues and forwards on its own; nothing here reads responses,
//! so a send that the network rejects looks identical to a delivered
//! one. The returned error only covers the serial leg.

use embedded_io::Write;
use heapless::String;

use sortbin_core::traits::{AlertTransport, Clock, TransportError};

/// Message body terminator in text mode
const CTRL_Z: u8 = 0x1A;

/// Settle time after a command before the modem accepts the next
const COMMAND_SETTLE_MS: u32 = 100;

/// Settle time after the body while the modem queues the message
const SEND_SETTLE_MS: u32 = 500;

/// Text-mode SMS body limit
const MAX_TEXT_LEN: usize = 160;

/// Build the send command for a destination number
pub fn cmgs_command(destination: &str) -> Result<String<32>, TransportError> {
    let mut cmd: String<32> = String::new();
    if cmd.push_str("AT+CMGS=\"").is_err()
        || cmd.push_str(destination).is_err()
        || cmd.push('"').is_err()
    {
        return Err(TransportError::MessageTooLong);
    }
    Ok(cmd)
}

/// SMS modem transport
pub struct Sim800<U, C> {
    serial: U,
    clock: C,
    destination: &'static str,
}

impl<U, C> Sim800<U, C>
where
    U: Write,
    C: Clock,
{
    /// Create the transport with its fixed destination number
    pub fn new(serial: U, destination: &'static str, clock: C) -> Self {
        Self {
            serial,
            clock,
            destination,
        }
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), TransportError> {
        while !bytes.is_empty() {
            match self.serial.write(bytes) {
                Ok(0) | Err(_) => return Err(TransportError::Serial),
                Ok(written) => bytes = &bytes[written..],
            }
        }
        Ok(())
    }

    fn command(&mut self, cmd: &str) -> Result<(), TransportError> {
        self.write_all(cmd.as_bytes())?;
        self.write_all(b"\r")
    }

    /// Send one text message to the configured destination
    pub fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        if text.len() > MAX_TEXT_LEN {
            return Err(TransportError::MessageTooLong);
        }

        self.command("AT+CMGF=1")?;
        self.clock.delay_ms(COMMAND_SETTLE_MS);

        let send_cmd = cmgs_command(self.destination)?;
        self.command(&send_cmd)?;
        self.clock.delay_ms(COMMAND_SETTLE_MS);

        self.write_all(text.as_bytes())?;
        self.write_all(&[CTRL_Z])?;
        self.serial.flush().map_err(|_| TransportError::Serial)?;
        self.clock.delay_ms(SEND_SETTLE_MS);
        Ok(())
    }
}

impl<U, C> AlertTransport for Sim800<U, C>
where
    U: Write,
    C: Clock,
{
    fn send_alert(&mut self, text: &str) -> Result<(), TransportError> {
        self.send_text(text)
    }
}
