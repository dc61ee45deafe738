use std::f32::consts::FRAC_PI_2;

use vitrail::math::{Vec3, Vec4};
use vitrail::{AppConfig, LoggingConfig, Mesh, MixMode, Object, Texture, init_logging};

const BASE_TEXTURE: &str = "res/assets/texture.png";
const LAYER_TEXTURE: &str = "res/assets/layer.png";
const HEIGHTMAP: &str = "res/assets/height.png";

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = AppConfig::new().title("Vitrail").size(800, 600).target_fps(60);

    vitrail::run(config, |ctx| {
        ctx.camera.set_fov(90.0);

        let quad = ctx.mesh(Mesh::quad());
        let ring = ctx.mesh(Mesh::square_ring(0.2));

        let base = load_or(BASE_TEXTURE, || {
            Texture::checkerboard(256, 32, [230, 230, 230, 255], [60, 60, 60, 255])
        });
        let base = ctx.texture(base);
        let base = ctx.material(base);

        let layer = load_or(LAYER_TEXTURE, || {
            Texture::checkerboard(256, 8, [255, 255, 255, 255], [180, 180, 180, 255])
        });
        let layer = ctx.texture(layer);
        let layer = ctx.material(layer);
        ctx.layer(layer, MixMode::Multiply);

        ctx.scene
            .add_cube_faces_with(quad, Some(base), Vec3::new(4.0, 0.0, 0.0), 0.5)
            .add_cube_faces_with(quad, Some(base), Vec3::new(-4.0, 0.0, 0.0), 1.0)
            .push(
                Object::new(quad)
                    .at(Vec3::new(0.0, 0.0, -10.0))
                    .uniform_scale(5.0)
                    .with_material(base),
            )
            .push(
                Object::new(ring)
                    .at(Vec3::new(0.0, 0.0, -4.0))
                    .with_albedo(Vec4::new(1.0, 1.0, 1.0, 0.75))
                    .with_material(base),
            );

        let heightmap = Texture::open(HEIGHTMAP, 1);
        if heightmap.loaded() {
            let terrain = ctx.mesh(Mesh::from_heightmap(&heightmap, 0.1, 40, 40));
            ctx.scene.push(
                Object::new(terrain)
                    .at(Vec3::new(0.0, -3.0, -6.0))
                    .rotated(Vec3::new(-FRAC_PI_2, 0.0, 0.0))
                    .uniform_scale(4.0)
                    .with_material(base),
            );
        }
        ctx.texture(heightmap);

        |frame: &mut vitrail::Frame| {
            if frame.time.frame_index % 600 == 0 {
                log::debug!("{} ({:.0} fps)", frame.camera, frame.fps());
            }
        }
    })
}

/// Loads an RGBA texture, or builds a stand-in when the file is missing.
fn load_or(path: &str, fallback: impl FnOnce() -> Texture) -> Texture {
    let texture = Texture::open(path, 4);
    if texture.loaded() {
        texture
    } else {
        log::warn!("Using a procedural texture in place of {path}");
        fallback()
    }
}
