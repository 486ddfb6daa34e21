// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering for the pairing code.

use famulus_core::FamulusError;
use qrcode::QrCode;
use qrcode::render::unicode;

/// Renders the pairing payload as a scannable unicode QR block followed by
/// the raw string, ready for `println!`.
pub fn render_terminal(code: &str) -> Result<String, FamulusError> {
    let qr = QrCode::new(code.as_bytes())
        .map_err(|e| FamulusError::channel(format!("failed to encode pairing QR: {e}")))?;
    let image = qr
        .render::<unicode::Dense1x2>()
        .quiet_zone(true)
        .build();
    Ok(format!("{image}\n{code}"))
}
