use approx::assert_relative_eq;
use ndarray::{Array, Array1, Array3, ArrayView1, ArrayView2, ArrayView3, ArrayView4};
use net2net::{deepen_conv2d, deepen_dense, widen_conv2d, widen_dense, Conv2d, Dense, WidenInit};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

fn sample(rng: &mut StdRng, len: usize) -> Vec<f32> {
    Normal::new(0., 1.)
        .unwrap()
        .sample_iter(rng)
        .take(len)
        .collect()
}

fn dense_forward(x: ArrayView1<f32>, weight: ArrayView2<f32>, bias: ArrayView1<f32>) -> Array1<f32> {
    x.dot(&weight) + &bias
}

fn relu(x: Array1<f32>) -> Array1<f32> {
    x.mapv(|v| v.max(0.))
}

// Naive convolution with same padding, input and output laid out as
// (channels, h, w).
fn conv2d_same(input: ArrayView3<f32>, kernel: ArrayView4<f32>, bias: ArrayView1<f32>) -> Array3<f32> {
    let (channels, h, w) = input.dim();
    let (filters, in_channels, kh, kw) = kernel.dim();
    assert_eq!(channels, in_channels);
    let (ph, pw) = ((kh - 1) / 2, (kw - 1) / 2);
    let mut output = Array3::zeros((filters, h, w));
    for f in 0..filters {
        for y in 0..h {
            for x in 0..w {
                let mut acc = bias[f];
                for c in 0..channels {
                    for dy in 0..kh {
                        for dx in 0..kw {
                            let (iy, ix) = (y + dy, x + dx);
                            if iy >= ph && ix >= pw && iy - ph < h && ix - pw < w {
                                acc += input[[c, iy - ph, ix - pw]] * kernel[[f, c, dy, dx]];
                            }
                        }
                    }
                }
                output[[f, y, x]] = acc;
            }
        }
    }
    output
}

// A 10 -> 4 -> 3 teacher with fc1 widened to 6 units must produce the same
// outputs as before the widen.
#[test]
fn net2wider_dense_preserves_function() {
    let mut rng = StdRng::seed_from_u64(1337);
    let w1 = Array::from_shape_vec((10, 4), sample(&mut rng, 40)).unwrap();
    let b1 = Array::from_vec(sample(&mut rng, 4));
    let w2 = Array::from_shape_vec((4, 3), sample(&mut rng, 12)).unwrap();
    let b2 = Array::from_vec(sample(&mut rng, 3));
    let fc1 = Dense::new(w1, b1).unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let (wider, student_w2) =
        widen_dense(&fc1, w2.view(), 6, WidenInit::Net2Wider, &mut rng).unwrap();
    assert_eq!(wider.weight().dim(), (10, 6));
    assert_eq!(student_w2.dim(), (6, 3));

    let x = Array::from_vec(sample(&mut StdRng::seed_from_u64(7), 10));
    let hidden = dense_forward(x.view(), fc1.weight(), fc1.bias());
    let teacher_out = dense_forward(hidden.view(), w2.view(), b2.view());
    let hidden = dense_forward(x.view(), wider.weight(), wider.bias());
    let student_out = dense_forward(hidden.view(), student_w2.view(), b2.view());
    assert_eq!(student_out.len(), 3);
    assert_relative_eq!(student_out, teacher_out, epsilon = 1e-5, max_relative = 1e-5);
}

// Replicated units pass through an intermediate ReLU unchanged, so
// preservation also holds for the activated network.
#[test]
fn net2wider_dense_preserves_function_with_relu() {
    let mut rng = StdRng::seed_from_u64(99);
    let w1 = Array::from_shape_vec((6, 5), sample(&mut rng, 30)).unwrap();
    let b1 = Array::from_vec(sample(&mut rng, 5));
    let w2 = Array::from_shape_vec((5, 2), sample(&mut rng, 10)).unwrap();
    let b2 = Array::from_vec(sample(&mut rng, 2));
    let fc1 = Dense::new(w1, b1).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let (wider, student_w2) =
        widen_dense(&fc1, w2.view(), 9, WidenInit::Net2Wider, &mut rng).unwrap();

    let x = Array::from_vec(sample(&mut StdRng::seed_from_u64(8), 6));
    let teacher_out = dense_forward(
        relu(dense_forward(x.view(), fc1.weight(), fc1.bias())).view(),
        w2.view(),
        b2.view(),
    );
    let student_out = dense_forward(
        relu(dense_forward(x.view(), wider.weight(), wider.bias())).view(),
        student_w2.view(),
        b2.view(),
    );
    assert_relative_eq!(student_out, teacher_out, epsilon = 1e-5, max_relative = 1e-5);
}

// The negative control: random padding changes the function.
#[test]
fn random_pad_does_not_preserve_function() {
    let mut rng = StdRng::seed_from_u64(1337);
    let w1 = Array::from_shape_vec((10, 4), sample(&mut rng, 40)).unwrap();
    let b1 = Array::from_vec(sample(&mut rng, 4));
    let w2 = Array::from_shape_vec((4, 3), sample(&mut rng, 12)).unwrap();
    let b2 = Array::from_vec(sample(&mut rng, 3));
    let fc1 = Dense::new(w1, b1).unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let (wider, student_w2) =
        widen_dense(&fc1, w2.view(), 6, WidenInit::RandomPad, &mut rng).unwrap();

    let x = Array::from_vec(sample(&mut StdRng::seed_from_u64(7), 10));
    let hidden = dense_forward(x.view(), fc1.weight(), fc1.bias());
    let teacher_out = dense_forward(hidden.view(), w2.view(), b2.view());
    let hidden = dense_forward(x.view(), wider.weight(), wider.bias());
    let student_out = dense_forward(hidden.view(), student_w2.view(), b2.view());
    assert!(teacher_out
        .iter()
        .zip(student_out.iter())
        .any(|(t, s)| (t - s).abs() > 1e-4));
}

#[test]
fn net2wider_conv_preserves_function() {
    let mut rng = StdRng::seed_from_u64(2024);
    let w1 = Array::from_shape_vec((2, 1, 3, 3), sample(&mut rng, 18)).unwrap();
    let b1 = Array::from_vec(sample(&mut rng, 2));
    let w2 = Array::from_shape_vec((3, 2, 3, 3), sample(&mut rng, 54)).unwrap();
    let b2 = Array::from_vec(sample(&mut rng, 3));
    let conv1 = Conv2d::new(w1, b1).unwrap();

    let mut rng = StdRng::seed_from_u64(11);
    let (wider, student_w2) =
        widen_conv2d(&conv1, w2.view(), 4, WidenInit::Net2Wider, &mut rng).unwrap();
    assert_eq!(wider.weight().dim(), (4, 1, 3, 3));
    assert_eq!(student_w2.dim(), (3, 4, 3, 3));

    let input = Array::from_shape_vec((1, 4, 4), sample(&mut StdRng::seed_from_u64(9), 16)).unwrap();
    let hidden = conv2d_same(input.view(), conv1.weight(), conv1.bias());
    let teacher_out = conv2d_same(hidden.view(), w2.view(), b2.view());
    let hidden = conv2d_same(input.view(), wider.weight(), wider.bias());
    let student_out = conv2d_same(hidden.view(), student_w2.view(), b2.view());
    assert_relative_eq!(student_out, teacher_out, epsilon = 1e-4, max_relative = 1e-4);
}

// Convolving with the deepen kernel reproduces the input exactly.
#[test]
fn net2deeper_conv_is_identity() {
    let mut rng = StdRng::seed_from_u64(5);
    let prev_weight = Array::from_shape_vec((3, 2, 3, 3), sample(&mut rng, 54)).unwrap();
    let (kernel, bias) = deepen_conv2d(prev_weight.view()).unwrap();
    assert_eq!(kernel.dim(), (3, 3, 3, 3));

    let input = Array::from_shape_vec((3, 5, 5), sample(&mut rng, 75)).unwrap();
    let output = conv2d_same(input.view(), kernel.view(), bias.view());
    assert_relative_eq!(output, input, epsilon = 1e-6);
}

// The dense identity layer passes ReLU outputs through unchanged.
#[test]
fn net2deeper_dense_is_identity_after_relu() {
    let mut rng = StdRng::seed_from_u64(6);
    let hidden = relu(Array::from_vec(sample(&mut rng, 8)));
    let (weight, bias) = deepen_dense(8);
    let output = relu(dense_forward(hidden.view(), weight.view(), bias.view()));
    assert_relative_eq!(output, hidden, epsilon = 1e-6);
}
