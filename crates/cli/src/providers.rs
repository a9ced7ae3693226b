//! Entry points compiled into the `bootlayer` binary.
//!
//! A unit makes one of these launchable by listing its id in
//! `META-INF/services/bootlayer.EntryPoint`.

use std::io::Write;

use bootlayer_lib::Bootstrap;
use bootlayer_lib::launch::EntryPoint;

pub const ECHO: &str = "bootlayer.cli.Echo";

/// Prints each argument on its own line.
pub struct Echo;

impl EntryPoint for Echo {
  fn name(&self) -> String {
    ECHO.to_string()
  }

  fn main(&self, args: &[String]) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    for arg in args {
      writeln!(out, "{}", arg)?;
    }
    out.flush()?;
    Ok(())
  }
}

pub fn register(bootstrap: &mut Bootstrap) {
  bootstrap.register_entry_point(ECHO, || Box::new(Echo));
}
