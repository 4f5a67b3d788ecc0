use rand::{rngs::StdRng, Rng, SeedableRng};

use prism_tracer::{Object, Ray, Vec3};

fn shapes() -> Vec<Object> {
    let at = Vec3::new(0.5, -0.25, 1.0);
    vec![
        Object::sphere("sphere", 1.2).with_position(at),
        Object::plane("plane", Vec3::new(0.2, 1.0, -0.1)).with_position(at),
        Object::rect_plane("rect", 2.0, 1.0, Vec3::new(0.0, 0.5, 1.0)).with_position(at),
        Object::rect_plane("rect-up", 1.5, 2.5, Vec3::Y).with_position(at),
        Object::disk("disk", 1.3, Vec3::new(1.0, 0.0, 1.0)).with_position(at),
        Object::prism("prism", Vec3::new(2.0, 0.6, 1.4)).with_position(at),
        Object::pyramid("pyramid", 2.0, 1.5).with_position(at),
    ]
}

fn random_unit(rng: &mut StdRng) -> Vec3 {
    loop {
        let v = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        let len2 = v.length_squared();
        if len2 > 1e-3 && len2 <= 1.0 {
            return v.normalized();
        }
    }
}

/// Rays from a shell around the object aimed at random points near it.
fn sample_rays(o: &Object, rng: &mut StdRng, n: usize) -> Vec<Ray> {
    let center = o.position;
    (0..n)
        .map(|_| {
            let origin = center + random_unit(rng) * 8.0;
            let aim = center
                + Vec3::new(rng.gen_range(-1.5..1.5), rng.gen_range(-1.5..1.5), rng.gen_range(-1.5..1.5));
            Ray::new(origin, aim - origin)
        })
        .collect()
}

#[test]
fn hit_points_lie_in_the_object() {
    let mut rng = StdRng::seed_from_u64(7);
    for o in shapes() {
        let mut hits = 0;
        for ray in sample_rays(&o, &mut rng, 3000) {
            let Some(hit) = o.intersect(&ray) else { continue };
            hits += 1;
            assert!(hit.t > 0.001, "{}: t = {}", o.name, hit.t);
            assert!((hit.normal.length() - 1.0).abs() < 1e-4, "{}: normal {:?}", o.name, hit.normal);
            assert!((ray.at(hit.t) - hit.point).length() < 1e-4);
            // Step just inside the surface to stay clear of boundary rounding.
            let inside = hit.point - hit.normal * 1e-4;
            assert!(o.contains_point(inside), "{}: {:?} not contained", o.name, hit.point);
        }
        assert!(hits > 100, "{} was hit only {hits} times", o.name);
    }
}

#[test]
fn bounding_boxes_enclose_hit_points() {
    let mut rng = StdRng::seed_from_u64(11);
    for o in shapes() {
        let bounds = o.bounding_box();
        for ray in sample_rays(&o, &mut rng, 3000) {
            // The infinite plane's box is finite; grazing hits can run past it.
            if let Some(hit) = o.intersect(&ray).filter(|h| h.t < 900.0) {
                assert!(
                    bounds.contains_within(hit.point, 1e-3),
                    "{}: {:?} outside {:?}",
                    o.name,
                    hit.point,
                    bounds
                );
            }
        }
    }
}

#[test]
fn normals_face_the_incoming_ray_from_outside() {
    let mut rng = StdRng::seed_from_u64(3);
    for o in shapes().into_iter().filter(|o| !matches!(o.name.as_str(), "plane" | "rect" | "rect-up" | "disk")) {
        for ray in sample_rays(&o, &mut rng, 1000) {
            if let Some(hit) = o.intersect(&ray) {
                assert!(hit.normal.dot(ray.direction) <= 1e-4, "{}: back-facing normal", o.name);
            }
        }
    }
}

#[test]
fn sphere_chord_through_center() {
    let o = Object::sphere("s", 2.0).with_position(Vec3::new(1.0, 1.0, 1.0));
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..200 {
        let dir = random_unit(&mut rng);
        let origin = o.position - dir * 6.0;
        let ray = Ray::new(origin, dir);
        let near = o.intersect(&ray).unwrap();
        assert!((near.t - 4.0).abs() < 1e-3);
        assert!((near.point - o.position).normalized().cross(near.normal).length() < 1e-3);

        // Second root: restart just past the first hit.
        let inner = Ray::new(near.point + dir * 0.01, dir);
        let far = o.intersect(&inner).unwrap();
        assert!((far.t + 0.01 - 4.0).abs() < 1e-3);
    }
}

#[test]
fn plane_hit_below_origin() {
    let o = Object::plane("floor", Vec3::Y).with_position(Vec3::new(0.0, -2.0, 0.0));
    let hit = o.intersect(&Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0))).unwrap();
    assert!((hit.t - 2.0).abs() < 1e-6);
    assert_eq!(hit.point, Vec3::new(0.0, -2.0, 0.0));
    assert_eq!(hit.normal, Vec3::Y);
}

#[test]
fn pyramid_apex_from_above() {
    let o = Object::pyramid("p", 2.0, 2.0);
    let ray = Ray::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
    let hit = o.intersect(&ray).unwrap();
    assert!((hit.point - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-4);
    assert!(hit.normal.y > 0.0);
    assert!(hit.normal.y < 0.99, "expected a side normal, got {:?}", hit.normal);
}
