//! Einzelner Point-of-Interest (POI) eines Marker-Packs.

use super::FileKey;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use glam::DVec3;
use uuid::Uuid;

/// Pack-lokales Handle eines Markers in der Arena von `LoadedMarkerPack`.
///
/// GUIDs sind Nutzdaten und in handgeschriebenen Packs nicht zwingend eindeutig,
/// deshalb referenzieren Dateilisten, Kategorien und Actions Marker über dieses Handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u64);

impl MarkerId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Rohwert (nur für Logging/Debugging).
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Die editierbaren Felder eines Markers.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerFields {
    /// Map-ID
    pub map_id: i32,
    /// Position (x, y, z)
    pub position: DVec3,
    /// Punktierter Kategorie-Pfad (`type`-Attribut)
    pub marker_type: String,
}

/// Ein POI: Position, Map, Kategorie-Pfad und Quelldatei.
///
/// Feld-Änderungen über die Setter markieren den Marker als dirty, aber erst
/// nachdem `enable_change_tracking()` aufgerufen wurde. Ein Marker, der beim
/// Laden befüllt wird, bleibt dadurch sauber.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    guid: Uuid,
    map_id: i32,
    position: DVec3,
    marker_type: String,
    source_file: FileKey,
    dirty: bool,
    change_tracking: bool,
}

impl Marker {
    /// Erstellt einen Marker ohne aktives Change-Tracking.
    pub fn new(
        guid: Uuid,
        map_id: i32,
        position: DVec3,
        marker_type: impl Into<String>,
        source_file: FileKey,
    ) -> Self {
        Self {
            guid,
            map_id,
            position,
            marker_type: marker_type.into(),
            source_file,
            dirty: false,
            change_tracking: false,
        }
    }

    /// Erstellt einen neuen Marker mit frischer GUID und aktivem Change-Tracking.
    pub fn new_tracked(
        map_id: i32,
        position: DVec3,
        marker_type: impl Into<String>,
        source_file: FileKey,
    ) -> Self {
        let mut marker = Self::new(Uuid::new_v4(), map_id, position, marker_type, source_file);
        marker.enable_change_tracking();
        marker
    }

    /// Ab jetzt setzen Feld-Änderungen das Dirty-Flag.
    pub fn enable_change_tracking(&mut self) {
        self.change_tracking = true;
    }

    /// Ob Feld-Änderungen bereits getrackt werden.
    pub fn is_tracking_changes(&self) -> bool {
        self.change_tracking
    }

    pub fn guid(&self) -> Uuid {
        self.guid
    }

    /// GUID als 32 Hex-Zeichen ohne Bindestriche (Anzeige / Zwischenablage).
    pub fn guid_formatted(&self) -> String {
        self.guid.simple().to_string()
    }

    /// GUID im Pack-Format: Base64 der 16 Bytes in .NET-Reihenfolge.
    pub fn guid_base64(&self) -> String {
        BASE64.encode(self.guid.to_bytes_le())
    }

    pub fn map_id(&self) -> i32 {
        self.map_id
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// Punktierter Kategorie-Pfad, leer = Root-Kategorie.
    pub fn marker_type(&self) -> &str {
        &self.marker_type
    }

    pub fn source_file(&self) -> &FileKey {
        &self.source_file
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Momentaufnahme der editierbaren Felder.
    pub fn fields(&self) -> MarkerFields {
        MarkerFields {
            map_id: self.map_id,
            position: self.position,
            marker_type: self.marker_type.clone(),
        }
    }

    pub fn set_map_id(&mut self, map_id: i32) {
        if self.map_id != map_id {
            self.map_id = map_id;
            self.touch();
        }
    }

    pub fn set_position(&mut self, position: DVec3) {
        if self.position != position {
            self.position = position;
            self.touch();
        }
    }

    pub fn set_x(&mut self, x: f64) {
        self.set_position(DVec3::new(x, self.position.y, self.position.z));
    }

    pub fn set_y(&mut self, y: f64) {
        self.set_position(DVec3::new(self.position.x, y, self.position.z));
    }

    pub fn set_z(&mut self, z: f64) {
        self.set_position(DVec3::new(self.position.x, self.position.y, z));
    }

    pub fn set_marker_type(&mut self, marker_type: impl Into<String>) {
        let marker_type = marker_type.into();
        if self.marker_type != marker_type {
            self.marker_type = marker_type;
            self.touch();
        }
    }

    /// Übernimmt alle editierbaren Felder (jeweils mit Dirty-Tracking).
    pub fn apply_fields(&mut self, fields: &MarkerFields) {
        self.set_map_id(fields.map_id);
        self.set_position(fields.position);
        self.set_marker_type(fields.marker_type.clone());
    }

    /// Hängt den Marker an eine andere Quelldatei (Save-As). Kein Dirty-Effekt.
    pub fn set_source_file(&mut self, source_file: FileKey) {
        self.source_file = source_file;
    }

    /// Setzt das Dirty-Flag nach erfolgreichem Speichern zurück.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Stellt ein zuvor gemerktes Dirty-Flag wieder her (Undo).
    pub(crate) fn restore_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    fn touch(&mut self) {
        if self.change_tracking {
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Marker {
        Marker::new(
            Uuid::nil(),
            15,
            DVec3::new(1.0, 2.0, 3.0),
            "tyria.hearts",
            FileKey::new("a.xml"),
        )
    }

    #[test]
    fn edits_before_tracking_do_not_mark_dirty() {
        let mut marker = sample();
        marker.set_x(10.0);
        marker.set_marker_type("tyria");
        assert!(!marker.is_dirty());
    }

    #[test]
    fn edits_after_tracking_mark_dirty() {
        let mut marker = sample();
        marker.enable_change_tracking();

        marker.set_map_id(15);
        assert!(!marker.is_dirty(), "Gleicher Wert darf nicht dirty machen");

        marker.set_z(-4.5);
        assert!(marker.is_dirty());
        assert_eq!(marker.position(), DVec3::new(1.0, 2.0, -4.5));

        marker.clear_dirty();
        marker.set_source_file(FileKey::new("b.xml"));
        assert!(!marker.is_dirty(), "Umhängen der Quelldatei ist keine Feld-Änderung");
    }

    #[test]
    fn guid_base64_uses_dotnet_byte_order() {
        let guid = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
        let marker = Marker::new(guid, 0, DVec3::ZERO, "", FileKey::new("a.xml"));

        // .NET: erste drei Gruppen little-endian
        let expected = BASE64.encode([
            0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ]);
        assert_eq!(marker.guid_base64(), expected);
        assert_eq!(marker.guid_formatted(), "00112233445566778899aabbccddeeff");
    }
}
