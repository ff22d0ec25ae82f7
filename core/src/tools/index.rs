use itertools::Itertools;

/// Lists every index of an array with the given shape in row-major order, each
/// paired with its bracketed string form, e.g. `[1][0]`.
pub fn index_str(shape: &[usize]) -> Vec<(Vec<usize>, String)> {
    if shape.is_empty() {
        return vec![(Vec::new(), String::new())];
    }

    shape
        .iter()
        .map(|&dim| 0..dim)
        .multi_cartesian_product()
        .map(|index| {
            let text = index.iter().map(|i| format!("[{i}]")).collect();
            (index, text)
        })
        .collect()
}
