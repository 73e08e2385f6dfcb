use super::*;

#[test]
fn test_clones_share_the_flag() {
    let token = CancelToken::new();
    let handle = token.clone();
    assert!(!token.is_cancelled());

    handle.cancel();
    assert!(token.is_cancelled());

    token.reset();
    assert!(!handle.is_cancelled());
}
