//! End-to-end frames: build meshes, render them, inspect the buffers.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use softengine::prelude::*;
use softengine::render::DEPTH_CLEAR;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn camera() -> Camera {
    Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
}

fn lit_pixels(device: &Device) -> Vec<&[u8]> {
    device
        .color_buffer()
        .chunks_exact(4)
        .filter(|p| p[3] == 255 && (p[0] > 0 || p[1] > 0 || p[2] > 0))
        .collect()
}

/// One triangle in the z = 0 plane, normals facing `normal_z`.
fn triangle_scene(normal_z: f32) -> String {
    format!(
        r#"{{
            "materials": [],
            "meshes": [{{
                "name": "Tri",
                "uvCount": 1,
                "position": [0, 0, 0],
                "vertices": [-1, -1, 0,  0, 0, {normal_z},  0, 0,
                              1, -1, 0,  0, 0, {normal_z},  1, 0,
                              0,  1, 0,  0, 0, {normal_z},  0.5, 1],
                "indices": [0, 1, 2]
            }}]
        }}"#
    )
}

#[test]
fn cube_renders_lit_pixels() {
    let mut device = Device::new(WIDTH, HEIGHT);
    device.clear();
    let stats = device.render(&camera(), &[Mesh::cube()]);

    assert!(stats.faces_drawn <= 6);
    assert!(stats.faces_drawn > 0);
    assert!(!lit_pixels(&device).is_empty());

    // The cube is centered on the camera axis; sample just off its diagonal.
    let index = ((HEIGHT / 2 - 40) * WIDTH + WIDTH / 2 + 10) as usize;
    assert_eq!(device.color_buffer()[index * 4 + 3], 255);
    assert!(device.depth_buffer()[index] < DEPTH_CLEAR);
}

#[test]
fn rendering_is_deterministic_across_frames() {
    let mut cube = Mesh::cube();
    cube.rotation = Vec3::new(0.3, 0.6, 0.9);
    let meshes = [cube];

    let mut device = Device::new(WIDTH, HEIGHT);
    device.clear();
    device.render(&camera(), &meshes);
    let first = device.color_buffer().to_vec();

    device.clear();
    device.render(&camera(), &meshes);
    assert_eq!(device.color_buffer(), first.as_slice());
}

#[test]
fn json_triangle_facing_camera_is_drawn() {
    let scene = Scene::from_babylon_str(&triangle_scene(1.0), BuildOptions::default()).unwrap();

    let mut device = Device::new(WIDTH, HEIGHT);
    let stats = device.render(&camera(), scene.meshes());

    assert_eq!(stats.faces_drawn, 1);
    assert!(!lit_pixels(&device).is_empty());
}

#[test]
fn json_triangle_facing_away_is_culled() {
    let scene = Scene::from_babylon_str(&triangle_scene(-1.0), BuildOptions::default()).unwrap();

    let mut device = Device::new(WIDTH, HEIGHT);
    let stats = device.render(&camera(), scene.meshes());

    assert_eq!(stats.faces_culled, 1);
    assert!(device.color_buffer().iter().all(|&c| c == 0));
}

#[test]
fn texture_tints_the_lit_surface() {
    let mut scene = Scene::from_babylon_str(&triangle_scene(1.0), BuildOptions::default()).unwrap();
    let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
    scene
        .mesh_mut("Tri")
        .unwrap()
        .set_texture(Arc::new(Texture::from_image(red)));

    let mut device = Device::new(WIDTH, HEIGHT);
    device.render(&camera(), scene.meshes());

    let lit = lit_pixels(&device);
    assert!(!lit.is_empty());
    for pixel in lit {
        assert_eq!((pixel[1], pixel[2]), (0, 0));
    }
}

#[test]
fn presented_frame_matches_color_buffer() {
    let mut device = Device::new(64, 48);
    device.render(&camera(), &[Mesh::cube()]);

    let mut surface = ImageSurface::new();
    device.present(&mut surface).unwrap();
    let frame = surface.into_frame().unwrap();
    assert_eq!(frame.dimensions(), (64, 48));
    assert_eq!(frame.as_raw().as_slice(), device.color_buffer());
}
