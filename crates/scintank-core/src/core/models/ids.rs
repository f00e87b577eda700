use slotmap::new_key_type;

new_key_type! {
    pub struct MaterialId;
    pub struct VolumeId;
    pub struct SurfaceId;
    pub struct SensorId;
}
