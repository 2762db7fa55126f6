//! # Frame Inspector
//!
//! Decodes captured admin-port traffic and prints what each packet means.
//!
//! Input is hex on stdin, whitespace ignored. By default the bytes are a
//! size-prefixed stream; with `--raw` every line is one unframed packet
//! (`[tag][payload]`).
//!
//! ```bash
//! echo "0300 01" | frame_inspect
//! echo "02 0a" | frame_inspect --raw
//! frame_inspect --config codec.toml < capture.hex
//! ```

use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::Arc;

use ttd_admin::{server_registry, ServerBanned, ServerError, ServerFull, ServerHandlers};
use ttd_protocol::{CodecConfig, Dispatch, FrameDecoder, HandlerRegistry, Packet};

struct Printer;

impl ServerHandlers for Printer {
    fn on_full(&self, _message: ServerFull) {
        println!("  -> server full");
    }

    fn on_banned(&self, _message: ServerBanned) {
        println!("  -> banned");
    }

    fn on_error(&self, message: ServerError) {
        println!("  -> error {} ({})", message.code.as_u8(), message.code);
    }
}

struct Options {
    raw: bool,
    config: CodecConfig,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        raw: false,
        config: CodecConfig::default(),
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--raw" => options.raw = true,
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                options.config = CodecConfig::from_toml_file(&path).map_err(|e| e.to_string())?;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

/// Decodes hex, ignoring whitespace.
fn decode_hex(line: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in {line:?}"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let nibble = |c: char| {
                c.to_digit(16)
                    .ok_or_else(|| format!("invalid hex digit {c:?}"))
            };
            let byte = (nibble(pair[0])? << 4) | nibble(pair[1])?;
            u8::try_from(byte).map_err(|e| e.to_string())
        })
        .collect()
}

fn report(registry: &HandlerRegistry, packet: &Packet) {
    println!("packet tag={:#04x} payload={} bytes", packet.tag(), packet.len());
    match registry.dispatch(packet) {
        Ok(Dispatch::Handled { .. }) => {}
        Ok(Dispatch::Dropped { tag }) => println!("  -> no handler for {tag:#04x}, dropped"),
        Err(e) => println!("  -> decode failed: {e}"),
    }
}

fn run(options: &Options) -> Result<(), String> {
    let registry =
        server_registry(options.config.clone(), Arc::new(Printer)).map_err(|e| e.to_string())?;
    let mut decoder = FrameDecoder::new(&options.config).map_err(|e| e.to_string())?;

    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        let bytes = decode_hex(&line)?;
        if bytes.is_empty() {
            continue;
        }

        if options.raw {
            match Packet::from_bytes(&bytes) {
                Ok(packet) => report(&registry, &packet),
                Err(e) => println!("bad packet: {e}"),
            }
            continue;
        }

        decoder.extend(&bytes);
        while let Some(packet) = decoder.next_packet().map_err(|e| e.to_string())? {
            report(&registry, &packet);
        }
    }

    if decoder.buffered() > 0 {
        println!("{} trailing bytes (incomplete frame)", decoder.buffered());
    }
    Ok(())
}

fn main() -> ExitCode {
    let result = parse_args().and_then(|options| run(&options));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("frame_inspect: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("03 00 01").unwrap(), vec![0x03, 0x00, 0x01]);
        assert_eq!(decode_hex("DEADbeef").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(decode_hex("   ").unwrap(), Vec::<u8>::new());
        assert!(decode_hex("abc").is_err());
        assert!(decode_hex("zz").is_err());
    }

    #[test]
    fn test_decode_hex_rejects_signs() {
        assert!(decode_hex("+f").is_err());
        assert!(decode_hex("-1").is_err());
        assert!(decode_hex("0x").is_err());
    }
}
