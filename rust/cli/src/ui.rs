//! Terminal message helpers.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

pub fn write_help(out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  bet N              place a bet and deal")?;
    writeln!(out, "  hit | stand")?;
    writeln!(out, "  superpose CARD     spend a superpose chip (e.g. superpose p1)")?;
    writeln!(out, "  collapse CARD      spend a collapse chip")?;
    writeln!(out, "  entangle A B       spend an entangle chip on two superposed cards")?;
    writeln!(out, "  buy KIND           buy a superpose/collapse/entangle chip")?;
    writeln!(out, "  chips | help | q")?;
    writeln!(out, "Cards are p1, p2, ... for the player and d1, d2, ... for the dealer.")
}
