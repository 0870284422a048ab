use std::path::Path;

/// Best-effort extraction of a QR payload from a produced image. Every
/// failure mode — unreadable file, no grid, undecodable grid — collapses to
/// `None`; a missing QR code never fails a job.
pub fn decode(path: &Path) -> Option<String> {
    let image = image::open(path).ok()?.to_luma8();
    let (width, height) = image.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            image.get_pixel(x as u32, y as u32)[0]
        });
    let grids = prepared.detect_grids();
    let (_, content) = grids.first()?.decode().ok()?;
    Some(content)
}
