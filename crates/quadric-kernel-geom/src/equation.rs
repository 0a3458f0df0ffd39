//! The ten-coefficient quadric equation shared by every surface.
//!
//! `Ax² + By² + Cz² + Dxy + Exz + Fyz + Gx + Hy + Jz + K = 0`

use nalgebra::DMatrix;
use quadric_kernel_math::{Mat3, Tolerance, Vec3, V3D};

use crate::spec::format_list;
use crate::Side;

/// Surface number of a surface that has not been named.
pub const UNSET_ID: i32 = -1;

/// Coefficients of a quadric plus the surface number it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadricEquation {
    coeffs: [f64; 10],
    id: i32,
}

impl Default for QuadricEquation {
    fn default() -> Self {
        Self {
            coeffs: [0.0; 10],
            id: UNSET_ID,
        }
    }
}

impl QuadricEquation {
    pub(crate) fn from_coefficients(coeffs: [f64; 10]) -> Self {
        Self {
            coeffs,
            id: UNSET_ID,
        }
    }

    /// The coefficients `[A, B, C, D, E, F, G, H, J, K]`.
    pub fn coefficients(&self) -> &[f64; 10] {
        &self.coeffs
    }

    /// Surface number ([`UNSET_ID`] until assigned).
    pub fn id(&self) -> i32 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    pub(crate) fn set_coefficients(&mut self, coeffs: [f64; 10]) {
        self.coeffs = coeffs;
    }

    /// Value of the equation at `pt`. Negative is inside.
    pub fn value(&self, pt: &V3D) -> f64 {
        let c = &self.coeffs;
        let (x, y, z) = (pt.x, pt.y, pt.z);
        c[0] * x * x
            + c[1] * y * y
            + c[2] * z * z
            + c[3] * x * y
            + c[4] * x * z
            + c[5] * y * z
            + c[6] * x
            + c[7] * y
            + c[8] * z
            + c[9]
    }

    /// Gradient of the equation at `pt` (points towards the outside).
    pub fn gradient(&self, pt: &V3D) -> V3D {
        let c = &self.coeffs;
        let (x, y, z) = (pt.x, pt.y, pt.z);
        V3D::new(
            2.0 * c[0] * x + c[3] * y + c[4] * z + c[6],
            2.0 * c[1] * y + c[3] * x + c[5] * z + c[7],
            2.0 * c[2] * z + c[4] * x + c[5] * y + c[8],
        )
    }

    /// Classify `pt` by the sign of the equation value.
    pub fn side(&self, pt: &V3D) -> Side {
        Side::from_value(self.value(pt), Tolerance::DEFAULT.surface)
    }

    /// Unit gradient at `pt`; the zero vector where the gradient vanishes.
    pub fn normal(&self, pt: &V3D) -> V3D {
        self.gradient(pt).unit()
    }

    /// First-order distance estimate `|Q| / |∇Q|`.
    pub fn first_order_distance(&self, pt: &V3D) -> f64 {
        let value = self.value(pt).abs();
        let grad = self.gradient(pt).norm();
        if grad <= Tolerance::DEFAULT.linear {
            return value;
        }
        value / grad
    }

    /// The matrix form `xᵀMx + gᵀx + k` with `M` symmetric.
    pub fn quadratic_form(&self) -> (Mat3, Vec3, f64) {
        let c = &self.coeffs;
        let m = Mat3::new(
            c[0],
            c[3] / 2.0,
            c[4] / 2.0,
            c[3] / 2.0,
            c[1],
            c[5] / 2.0,
            c[4] / 2.0,
            c[5] / 2.0,
            c[2],
        );
        (m, Vec3::new(c[6], c[7], c[8]), c[9])
    }

    fn set_quadratic_form(&mut self, m: &Mat3, g: &Vec3, k: f64) {
        self.coeffs = [
            m[(0, 0)],
            m[(1, 1)],
            m[(2, 2)],
            m[(0, 1)] + m[(1, 0)],
            m[(0, 2)] + m[(2, 0)],
            m[(1, 2)] + m[(2, 1)],
            g.x,
            g.y,
            g.z,
            k,
        ];
    }

    /// Transform the coefficients for points mapped by `p → m·p`.
    ///
    /// Returns false (and leaves the equation alone) if `m` is singular.
    pub(crate) fn rotate(&mut self, m: &Mat3) -> bool {
        let Some(inv) = m.try_inverse() else {
            return false;
        };
        let (q, g, k) = self.quadratic_form();
        let q2 = inv.transpose() * q * inv;
        let g2 = inv.transpose() * g;
        self.set_quadratic_form(&q2, &g2, k);
        true
    }

    /// Transform the coefficients for points mapped by `p → p + v`.
    pub(crate) fn displace(&mut self, v: &V3D) {
        let t = Vec3::from(*v);
        let (q, g, k) = self.quadratic_form();
        let g2 = g - 2.0 * (q * t);
        let k2 = k + t.dot(&(q * t)) - g.dot(&t);
        self.set_quadratic_form(&q, &g2, k2);
    }

    /// Coefficients `[a, b, c]` of `aλ² + bλ + c` for points `origin + λ·dir`.
    pub fn along_line(&self, origin: &V3D, dir: &V3D) -> [f64; 3] {
        let c = &self.coeffs;
        let (a, b, cc) = (origin.x, origin.y, origin.z);
        let (d, e, f) = (dir.x, dir.y, dir.z);
        let quad = c[0] * d * d
            + c[1] * e * e
            + c[2] * f * f
            + c[3] * d * e
            + c[4] * d * f
            + c[5] * e * f;
        let lin = 2.0 * c[0] * a * d
            + 2.0 * c[1] * b * e
            + 2.0 * c[2] * cc * f
            + c[3] * (a * e + b * d)
            + c[4] * (a * f + cc * d)
            + c[5] * (b * f + cc * e)
            + c[6] * d
            + c[7] * e
            + c[8] * f;
        [quad, lin, self.value(origin)]
    }

    /// `gq A B C D E F G H J K`.
    pub fn spec_string(&self) -> String {
        format!("gq {}", format_list(&self.coeffs))
    }

    /// Exact distance from `pt` to the quadric.
    ///
    /// Solves for the stationary points of `|x - pt|²` on the surface with a
    /// Lagrange multiplier `t`: in the eigenframe of `M`,
    /// `x_i(t) = (p_i - t·h_i/2) / (1 + t·λ_i)`, and `Q(x(t)) = 0` becomes a
    /// polynomial in `t`. Eigenvalues that coincide are grouped so that the
    /// polynomial has no spurious repeated roots; the pole of each group is
    /// checked separately because a point on a symmetry axis or centre sees a
    /// whole circle of nearest points there.
    pub fn distance_true(&self, pt: &V3D) -> f64 {
        let (m, g, k) = self.quadratic_form();
        let eigen = m.symmetric_eigen();
        let frame = eigen.eigenvectors.transpose();
        let p = frame * Vec3::from(*pt);
        let h = frame * g;
        let lambda = eigen.eigenvalues;
        let groups = group_eigenvalues(&[lambda.x, lambda.y, lambda.z]);

        let lagrange = Lagrange {
            p: [p.x, p.y, p.z],
            h: [h.x, h.y, h.z],
            lambda: [lambda.x, lambda.y, lambda.z],
            k,
        };

        let mut best: Option<f64> = None;
        let mut consider = |d2: f64| {
            if d2.is_finite() && d2 >= 0.0 {
                best = Some(best.map_or(d2, |b: f64| b.min(d2)));
            }
        };

        for root in real_roots(&lagrange.polynomial(&groups)) {
            if let Some(t) = lagrange.polish(root) {
                if let Some(d2) = lagrange.distance2(t) {
                    consider(d2);
                }
            }
        }
        for group in &groups {
            if let Some(d2) = lagrange.pole_distance2(group, &groups) {
                consider(d2);
            }
        }

        match best {
            Some(d2) => d2.sqrt(),
            None => self.first_order_distance(pt),
        }
    }
}

/// Indices of equal eigenvalues, with the shared value.
#[derive(Debug, Clone)]
struct EigenGroup {
    value: f64,
    members: Vec<usize>,
}

fn group_eigenvalues(values: &[f64; 3]) -> Vec<EigenGroup> {
    let scale = values.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    let tol = 1e-12 * scale;
    let mut groups: Vec<EigenGroup> = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        let v = if v.abs() <= tol { 0.0 } else { v };
        match groups.iter_mut().find(|g| (g.value - v).abs() <= tol) {
            Some(g) => g.members.push(i),
            None => groups.push(EigenGroup {
                value: v,
                members: vec![i],
            }),
        }
    }
    groups
}

/// The Lagrange system in the eigenframe of the quadratic form.
struct Lagrange {
    p: [f64; 3],
    h: [f64; 3],
    lambda: [f64; 3],
    k: f64,
}

impl Lagrange {
    fn point(&self, t: f64) -> Option<[f64; 3]> {
        let mut x = [0.0; 3];
        for i in 0..3 {
            let d = 1.0 + t * self.lambda[i];
            if d.abs() < 1e-12 {
                return None;
            }
            x[i] = (self.p[i] - t * self.h[i] / 2.0) / d;
        }
        Some(x)
    }

    fn value(&self, x: &[f64; 3]) -> f64 {
        (0..3)
            .map(|i| self.lambda[i] * x[i] * x[i] + self.h[i] * x[i])
            .sum::<f64>()
            + self.k
    }

    fn scale(&self, x: &[f64; 3]) -> f64 {
        1.0 + self.k.abs()
            + (0..3)
                .map(|i| (self.lambda[i] * x[i] * x[i]).abs() + (self.h[i] * x[i]).abs())
                .sum::<f64>()
    }

    /// `Q(x(t)) · Π (1 + t·μ)²` over the distinct eigenvalues.
    fn polynomial(&self, groups: &[EigenGroup]) -> Vec<f64> {
        let denom = |g: &EigenGroup| vec![1.0, g.value];
        let mut total = poly_scale(
            &groups
                .iter()
                .fold(vec![1.0], |acc, g| poly_mul(&acc, &poly_mul(&denom(g), &denom(g)))),
            self.k,
        );
        for (gi, group) in groups.iter().enumerate() {
            let d = denom(group);
            let mut numerator = vec![0.0];
            for &i in &group.members {
                let n = vec![self.p[i], -self.h[i] / 2.0];
                let quad = poly_scale(&poly_mul(&n, &n), group.value);
                let lin = poly_scale(&poly_mul(&n, &d), self.h[i]);
                numerator = poly_add(&numerator, &poly_add(&quad, &lin));
            }
            let others = groups
                .iter()
                .enumerate()
                .filter(|(gj, _)| *gj != gi)
                .fold(vec![1.0], |acc, (_, g)| {
                    poly_mul(&acc, &poly_mul(&denom(g), &denom(g)))
                });
            total = poly_add(&total, &poly_mul(&numerator, &others));
        }
        total
    }

    /// Newton refinement of a polynomial root on the rational function.
    fn polish(&self, mut t: f64) -> Option<f64> {
        for _ in 0..50 {
            let x = self.point(t)?;
            let f = self.value(&x);
            let df: f64 = (0..3)
                .map(|i| {
                    let d = 1.0 + t * self.lambda[i];
                    let dx = (-self.h[i] / 2.0 - self.lambda[i] * self.p[i]) / (d * d);
                    (2.0 * self.lambda[i] * x[i] + self.h[i]) * dx
                })
                .sum();
            if df == 0.0 || !df.is_finite() {
                break;
            }
            let step = f / df;
            t -= step;
            if step.abs() <= 1e-15 * (1.0 + t.abs()) {
                break;
            }
        }
        let x = self.point(t)?;
        (self.value(&x).abs() <= 1e-8 * self.scale(&x)).then_some(t)
    }

    fn distance2(&self, t: f64) -> Option<f64> {
        let x = self.point(t)?;
        Some((0..3).map(|i| (x[i] - self.p[i]).powi(2)).sum())
    }

    /// Nearest distance² when `t = -1/μ` leaves the group's coordinates free.
    fn pole_distance2(&self, group: &EigenGroup, groups: &[EigenGroup]) -> Option<f64> {
        let mu = group.value;
        if mu == 0.0 {
            return None;
        }
        let t = -1.0 / mu;
        let centre_scale = 1.0 + group.members.iter().map(|&i| self.p[i].abs()).sum::<f64>();
        for &i in &group.members {
            if (self.p[i] + self.h[i] / (2.0 * mu)).abs() > 1e-9 * centre_scale {
                return None;
            }
        }
        let mut rest = self.k;
        let mut fixed2 = 0.0;
        for other in groups.iter().filter(|g| !std::ptr::eq(*g, group)) {
            for &j in &other.members {
                let d = 1.0 + t * self.lambda[j];
                if d.abs() < 1e-12 {
                    return None;
                }
                let x = (self.p[j] - t * self.h[j] / 2.0) / d;
                rest += self.lambda[j] * x * x + self.h[j] * x;
                fixed2 += (x - self.p[j]).powi(2);
            }
        }
        let h2: f64 = group.members.iter().map(|&i| self.h[i] * self.h[i]).sum();
        let rho2 = (h2 / (4.0 * mu) - rest) / mu;
        (rho2 >= 0.0).then_some(rho2 + fixed2)
    }
}

fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

fn poly_add(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len().max(b.len())];
    for (i, x) in a.iter().enumerate() {
        out[i] += x;
    }
    for (i, y) in b.iter().enumerate() {
        out[i] += y;
    }
    out
}

fn poly_scale(a: &[f64], s: f64) -> Vec<f64> {
    a.iter().map(|x| x * s).collect()
}

/// Real roots of a polynomial given lowest order first.
pub(crate) fn real_roots(coeffs: &[f64]) -> Vec<f64> {
    let scale = coeffs.iter().fold(0.0_f64, |acc, c| acc.max(c.abs()));
    if scale == 0.0 {
        return Vec::new();
    }
    let mut degree = coeffs.len() - 1;
    while degree > 0 && coeffs[degree].abs() <= 1e-14 * scale {
        degree -= 1;
    }
    let c = &coeffs[..=degree];
    match degree {
        0 => Vec::new(),
        1 => vec![-c[0] / c[1]],
        2 => solve_quadratic(c[2], c[1], c[0]),
        n => {
            let lead = c[n];
            let mut companion = DMatrix::<f64>::zeros(n, n);
            for i in 1..n {
                companion[(i, i - 1)] = 1.0;
            }
            for i in 0..n {
                companion[(i, n - 1)] = -c[i] / lead;
            }
            companion
                .complex_eigenvalues()
                .iter()
                .filter(|z| z.im.abs() <= 1e-6 * (1.0 + z.re.abs()))
                .map(|z| z.re)
                .collect()
        }
    }
}

/// Real roots of `a·x² + b·x + c`, ascending; a double root is returned once.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale == 0.0 {
        return Vec::new();
    }
    if a.abs() <= 1e-14 * scale {
        if b == 0.0 {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    if disc == 0.0 {
        return vec![-b / (2.0 * a)];
    }
    // Numerically stable form avoids cancellation.
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    let (r1, r2) = if q == 0.0 {
        let r = (-c / a).sqrt();
        (-r, r)
    } else {
        (q / a, c / q)
    };
    if r1 <= r2 {
        vec![r1, r2]
    } else {
        vec![r2, r1]
    }
}
