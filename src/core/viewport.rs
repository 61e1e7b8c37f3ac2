use crate::core::constants::{MAX_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, LatLngBounds, Point, TileCoord, EARTH_RADIUS};
use std::f64::consts::PI;

/// A base tile positioned in container pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    /// Tile to fetch; `x` is wrapped into the world
    pub coord: TileCoord,
    /// Top-left corner in container pixels
    pub min: Point,
    /// Edge length in pixels at the current (possibly fractional) zoom
    pub size: f64,
}

/// The current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, MAX_ZOOM),
            size,
            min_zoom: 0.0,
            max_zoom: MAX_ZOOM,
        }
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), center.lng);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Projects a LatLng to world pixel coordinates at the current zoom
    /// (Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let world = TILE_SIZE as f64 * 2_f64.powf(self.zoom);
        let mercator = lat_lng.to_mercator();
        let circumference = 2.0 * PI * EARTH_RADIUS;

        Point::new(
            (mercator.x + PI * EARTH_RADIUS) / circumference * world,
            (PI * EARTH_RADIUS - mercator.y) / circumference * world,
        )
    }

    /// Inverse of [`project`](Self::project)
    pub fn unproject(&self, pixel: &Point) -> LatLng {
        let world = TILE_SIZE as f64 * 2_f64.powf(self.zoom);
        let circumference = 2.0 * PI * EARTH_RADIUS;

        let x = pixel.x / world * circumference - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - pixel.y / world * circumference;
        LatLng::from_mercator(Point::new(x, y))
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let offset = self.project(lat_lng).subtract(&self.project(&self.center));
        Point::new(offset.x + self.size.x / 2.0, offset.y + self.size.y / 2.0)
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let offset = Point::new(pixel.x - self.size.x / 2.0, pixel.y - self.size.y / 2.0);
        self.unproject(&self.project(&self.center).add(&offset))
    }

    /// Moves the view by a pixel offset, as a drag would
    pub fn pan(&mut self, delta: Point) {
        let center_px = self.project(&self.center).subtract(&delta);
        let center = self.unproject(&center_px);
        self.set_center(center);
    }

    /// Zooms while keeping `focus` (container pixels) fixed on screen
    pub fn zoom_around(&mut self, zoom: f64, focus: Point) {
        let anchor = self.pixel_to_lat_lng(&focus);
        self.set_zoom(zoom);
        let drift = self.lat_lng_to_pixel(&anchor).subtract(&focus);
        let center_px = self.project(&self.center).add(&drift);
        let center = self.unproject(&center_px);
        self.set_center(center);
    }

    /// Tiles covering the container, row by row. The tile zoom is the current
    /// zoom rounded down and capped at `max_tile_zoom`; tiles are scaled up
    /// to fill fractional zooms. Columns past the antimeridian wrap around.
    pub fn visible_tiles(&self, max_tile_zoom: f64) -> Vec<TilePlacement> {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return Vec::new();
        }

        let z = self.zoom.floor().clamp(0.0, max_tile_zoom.max(0.0)) as u8;
        let n = 1_i64 << z;
        let size = TILE_SIZE as f64 * 2_f64.powf(self.zoom - z as f64);

        // World origin in container pixels
        let center = self.project(&self.center);
        let origin = Point::new(self.size.x / 2.0 - center.x, self.size.y / 2.0 - center.y);

        let x0 = (-origin.x / size).floor() as i64;
        let x1 = ((self.size.x - origin.x) / size).ceil() as i64 - 1;
        let y0 = ((-origin.y / size).floor() as i64).max(0);
        let y1 = (((self.size.y - origin.y) / size).ceil() as i64 - 1).min(n - 1);

        let mut tiles = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                tiles.push(TilePlacement {
                    coord: TileCoord::new(x.rem_euclid(n) as u32, y as u32, z),
                    min: Point::new(origin.x + x as f64 * size, origin.y + y as f64 * size),
                    size,
                });
            }
        }
        tiles
    }

    /// Centers on `bounds` at the largest whole zoom that still fits them
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) {
        self.set_center(bounds.center());

        let available = Point::new(self.size.x - 2.0 * padding, self.size.y - 2.0 * padding);
        let mut best_zoom = self.min_zoom;
        for z in (self.min_zoom as i32)..=(self.max_zoom as i32) {
            let candidate = Viewport::new(self.center, z as f64, self.size);
            let nw = candidate.project(&LatLng::new(bounds.north_east.lat, bounds.south_west.lng));
            let se = candidate.project(&LatLng::new(bounds.south_west.lat, bounds.north_east.lng));

            if (se.x - nw.x).abs() <= available.x && (se.y - nw.y).abs() <= available.y {
                best_zoom = z as f64;
            } else {
                break;
            }
        }
        self.set_zoom(best_zoom);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_maps_to_middle_of_container() {
        let center = LatLng::new(39.8283, -98.5795);
        let viewport = Viewport::new(center, 3.0, Point::new(800.0, 600.0));
        let pixel = viewport.lat_lng_to_pixel(&viewport.center);
        assert!((pixel.x - 400.0).abs() < 1e-6);
        assert!((pixel.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_roundtrip() {
        let viewport = Viewport::new(LatLng::new(10.0, 20.0), 4.0, Point::new(512.0, 512.0));
        let target = LatLng::new(12.5, 24.0);
        let back = viewport.pixel_to_lat_lng(&viewport.lat_lng_to_pixel(&target));
        assert!((back.lat - target.lat).abs() < 1e-9);
        assert!((back.lng - target.lng).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(25.0);
        assert_eq!(viewport.zoom, MAX_ZOOM);
        viewport.set_zoom(-1.0);
        assert_eq!(viewport.zoom, 0.0);
    }

    #[test]
    fn test_pan_moves_center_east() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        viewport.pan(Point::new(-10.0, 0.0));
        assert!(viewport.center.lng > 0.0);
        assert!(viewport.center.lat.abs() < 1e-9);
    }

    #[test]
    fn test_zoom_around_keeps_focus_fixed() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0));
        let focus = Point::new(600.0, 200.0);
        let before = viewport.pixel_to_lat_lng(&focus);
        viewport.zoom_around(4.0, focus);
        let after = viewport.lat_lng_to_pixel(&before);
        assert!(after.distance_to(&focus) < 1e-6);
    }

    #[test]
    fn test_world_tile_at_zoom_zero() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 0.0, Point::new(256.0, 256.0));
        let tiles = viewport.visible_tiles(MAX_ZOOM);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].coord, TileCoord::new(0, 0, 0));
        assert_eq!(tiles[0].min, Point::new(0.0, 0.0));
        assert_eq!(tiles[0].size, 256.0);
    }

    #[test]
    fn test_tiles_cover_container_at_zoom_one() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        let mut coords: Vec<_> = viewport
            .visible_tiles(MAX_ZOOM)
            .iter()
            .map(|t| (t.coord.x, t.coord.y, t.coord.z))
            .collect();
        coords.sort();
        assert_eq!(coords, [(0, 0, 1), (0, 1, 1), (1, 0, 1), (1, 1, 1)]);
    }

    #[test]
    fn test_tiles_wrap_and_clamp() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0));
        let tiles = viewport.visible_tiles(MAX_ZOOM);
        // five copies of the world tile side by side, no rows above or below
        assert_eq!(tiles.len(), 5);
        assert!(tiles.iter().all(|t| t.coord == TileCoord::new(0, 0, 0)));
    }

    #[test]
    fn test_fractional_zoom_scales_tiles() {
        let viewport = Viewport::new(LatLng::new(39.8283, -98.5795), 3.5, Point::new(800.0, 600.0));
        let tiles = viewport.visible_tiles(2.0);
        assert!(tiles.iter().all(|t| t.coord.z == 2));
        assert!((tiles[0].size - 256.0 * 2_f64.powf(1.5)).abs() < 1e-9);
    }

    #[test]
    fn test_fit_bounds() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0));
        let bounds = LatLngBounds::new(LatLng::new(30.0, -125.0), LatLng::new(50.0, -65.0));
        viewport.fit_bounds(&bounds, 20.0);
        // 60 degrees of longitude is 683 px wide at zoom 4 and 1365 px at zoom 5
        assert_eq!(viewport.zoom, 4.0);
        assert_eq!(viewport.center, bounds.center());
    }
}
