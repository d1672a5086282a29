use std::sync::Arc;

use adaptive_direct::{
    camera::PerspectiveCamera,
    core::{
        color::Color,
        film::{BoxFilter, PixelBounds},
        ray::Ray,
        rng::Rng,
        scene::Scene,
        scene_resources::SceneResources,
        surface::Surface,
    },
    direct::{
        CandidateBuilder, DirectLighting, DirectStrategy, Occluder, ShadingPoint, StoppingRule,
        VisibilityQuery,
    },
    light::{Light, PointLight},
    material::{Lambert, Material},
    primitive::{Instance, Primitive, Quad, Sphere},
    renderer::{DirectLightingRenderer, OutputConfig, Renderer, RendererT},
    sampler::{JitteredSampler, RandomSampler, Sampler},
};

fn lambert(rsc: &mut SceneResources, name: &str, albedo: f32) -> Arc<Material> {
    rsc.add_material(name.to_owned(), Lambert::new(Color::gray(albedo)).into())
        .unwrap();
    rsc.clone_material(name.to_owned()).unwrap()
}

fn add_instance(rsc: &mut SceneResources, name: &str, primitive: Primitive, surface: Surface) {
    rsc.add_primitive(name.to_owned(), primitive).unwrap();
    let primitive = rsc.clone_primitive(name.to_owned()).unwrap();
    rsc.add_instance(name.to_owned(), Instance::new(primitive, surface))
        .unwrap();
}

/// A large floor at `y = 0`, a small emissive panel facing down at `y = 2`, a
/// point light at `(0, 4, 0)` and a ball hanging right below the point light.
fn build_scene() -> Scene {
    let mut rsc = SceneResources::default();
    rsc.add_camera(
        "main".to_owned(),
        PerspectiveCamera::new(
            glam::Vec3A::new(0.0, 3.0, 6.0),
            glam::Vec3A::new(0.0, -0.5, -1.0),
            glam::Vec3A::Y,
            std::f32::consts::FRAC_PI_3,
        )
        .into(),
    )
    .unwrap();

    let white = lambert(&mut rsc, "white", 0.5);
    add_instance(
        &mut rsc,
        "floor",
        Quad::new(
            glam::Vec3A::new(-10.0, 0.0, -10.0),
            glam::Vec3A::new(0.0, 0.0, 20.0),
            glam::Vec3A::new(20.0, 0.0, 0.0),
        )
        .into(),
        Surface::new(white.clone(), Color::BLACK, false, 1),
    );
    add_instance(
        &mut rsc,
        "panel",
        Quad::new(
            glam::Vec3A::new(1.5, 2.0, -0.5),
            glam::Vec3A::new(1.0, 0.0, 0.0),
            glam::Vec3A::new(0.0, 0.0, 1.0),
        )
        .into(),
        Surface::new(white.clone(), Color::gray(4.0), false, 16),
    );
    add_instance(
        &mut rsc,
        "ball",
        Sphere::new(glam::Vec3A::new(0.0, 1.0, 0.0), 0.5).into(),
        Surface::new(white, Color::BLACK, false, 1),
    );

    rsc.add_light(
        "key".to_owned(),
        PointLight::new(glam::Vec3A::new(0.0, 4.0, 0.0), Color::gray(16.0), 1).into(),
    )
    .unwrap();

    rsc.to_scene().unwrap()
}

fn floor_point(x: f32, z: f32) -> ShadingPoint {
    ShadingPoint {
        position: glam::Vec3A::new(x, 0.0, z),
        normal: glam::Vec3A::Y,
        wo: glam::Vec3A::new(0.0, 1.0, 1.0).normalize(),
    }
}

fn lighting(scene: &Scene, strategy: DirectStrategy) -> DirectLighting<Light> {
    let sampler: Sampler = JitteredSampler::new(2, 2).into();
    let candidates = CandidateBuilder::new(&sampler, Rng::with_seed(11)).build(scene.lights());
    DirectLighting::new(candidates, strategy)
}

fn floor_material(scene: &Scene) -> &Material {
    let mut inter = Default::default();
    let ray = Ray::new(glam::Vec3A::new(4.0, 1.0, 4.0), -glam::Vec3A::Y);
    assert!(scene.intersect(&ray, &mut inter));
    let instance: &Instance = inter.instance.unwrap();
    instance.surface().material()
}

#[test]
fn scene_occludes_through_the_ball() {
    let scene = build_scene();
    let under_ball = VisibilityQuery::new(glam::Vec3A::ZERO, glam::Vec3A::Y, 4.0);
    assert!(!scene.is_unoccluded(&under_ball));

    let beside = glam::Vec3A::new(-3.0, 0.0, 0.0);
    let to_light = glam::Vec3A::new(0.0, 4.0, 0.0) - beside;
    let query = VisibilityQuery::new(beside, to_light.normalize(), to_light.length());
    assert!(scene.is_unoccluded(&query));
}

#[test]
fn candidates_follow_light_order() {
    let scene = build_scene();
    let lighting = lighting(&scene, DirectStrategy::Exhaustive);
    // explicit point light first, then the panel with its 16 samples
    assert_eq!(scene.lights().len(), 2);
    assert_eq!(lighting.candidates().len(), 17);
    assert_eq!(lighting.candidates()[0].light_index, 0);
    assert!(lighting.candidates()[1..]
        .iter()
        .all(|cand| cand.light_index == 1 && (cand.weight - 1.0 / 16.0).abs() < 1e-6));
}

#[test]
fn point_light_matches_closed_form() {
    let scene = build_scene();
    let material = floor_material(&scene);
    let lighting = lighting(&scene, DirectStrategy::Exhaustive);

    let point = floor_point(-3.0, 0.0);
    let estimate = lighting.estimate_detailed(&point, material, &scene, &[]);

    let to_light = glam::Vec3A::new(0.0, 4.0, 0.0) - point.position;
    let cos = to_light.normalize().y;
    let expected = 0.5 * std::f32::consts::FRAC_1_PI * 16.0 / to_light.length_squared() * cos;
    // the panel adds whatever the ball doesn't hide
    assert!(estimate.radiance.g >= expected - 1e-5);
    assert!(estimate.hit >= 1);
}

#[test]
fn shadowed_point_only_sees_the_panel() {
    let scene = build_scene();
    let material = floor_material(&scene);
    let lighting = lighting(&scene, DirectStrategy::Exhaustive);

    let estimate = lighting.estimate_detailed(&floor_point(0.0, 0.0), material, &scene, &[]);
    // the point light is behind the ball, every panel sample is visible
    assert_eq!(estimate.sampled, 17);
    assert_eq!(estimate.hit, 16);
    assert!(estimate.radiance.g > 0.0);
}

#[test]
fn strict_adaptive_equals_exhaustive() {
    let scene = build_scene();
    let material = floor_material(&scene);
    let exhaustive = lighting(&scene, DirectStrategy::Exhaustive);
    let adaptive = lighting(
        &scene,
        DirectStrategy::Adaptive(StoppingRule::new(1.0, 0.0).unwrap()),
    );

    for &(x, z) in &[(0.0, 0.0), (2.0, 0.0), (-3.0, 1.0), (0.4, -0.2), (6.0, 6.0)] {
        let point = floor_point(x, z);
        let a = exhaustive.estimate(&point, material, &scene, &[]);
        let b = adaptive.estimate(&point, material, &scene, &[]);
        assert!((a.r - b.r).abs() <= 1e-5 * a.r.max(1.0), "at ({}, {})", x, z);
    }
}

#[test]
fn adaptive_statistics_stay_consistent() {
    let scene = build_scene();
    let material = floor_material(&scene);
    let lighting = lighting(&scene, DirectStrategy::Adaptive(StoppingRule::default()));

    let mut rng = Rng::with_seed(5);
    let mut traced = 0;
    for _ in 0..64 {
        let (u, v) = rng.uniform_2d();
        let point = floor_point(u * 6.0 - 3.0, v * 6.0 - 3.0);
        let estimate = lighting.estimate_detailed(&point, material, &scene, &[]);
        assert!(estimate.hit <= estimate.sampled);
        assert!(estimate.radiance.is_finite());
        traced += estimate.sampled;
    }

    let totals = lighting.statistics().totals();
    assert_eq!(totals.sampled, traced);
    for entry in lighting.statistics().snapshot() {
        assert!(entry.hit <= entry.sampled);
    }
}

#[test]
fn render_window_to_png() {
    let scene = build_scene();
    let renderer: Renderer = DirectLightingRenderer::new(
        2,
        DirectStrategy::Adaptive(StoppingRule::default()),
        RandomSampler::new(2).into(),
        BoxFilter::default(),
    )
    .with_seed(3)
    .with_rotation(true)
    .with_pixel_bounds(PixelBounds {
        x0: 2,
        x1: 10,
        y0: 2,
        y1: 6,
    })
    .into();

    let dir = std::env::temp_dir().join(format!("adaptive-direct-render-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let output = dir.join("window.png");
    let config = OutputConfig {
        width: 12,
        height: 8,
        output_filename: output.to_string_lossy().into_owned(),
        used_camera_name: "main".to_owned(),
    };
    renderer.render(&scene, &config).unwrap();

    let image = image::open(&output).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (12, 8));
    // pixels outside the window are never shaded
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);

    let missing_camera = OutputConfig {
        used_camera_name: "side".to_owned(),
        ..config
    };
    assert!(renderer.render(&scene, &missing_camera).is_err());
}
