#[test]
fn reads_an_empty_capture() {
    let mut data = Vec::new();
    data.extend_from_slice(&0xa1b2_c3d4u32.to_ne_bytes());
    data.extend_from_slice(&2u16.to_ne_bytes());
    data.extend_from_slice(&4u16.to_ne_bytes());
    data.extend_from_slice(&0i32.to_ne_bytes());
    data.extend_from_slice(&0u32.to_ne_bytes());
    data.extend_from_slice(&65535u32.to_ne_bytes());
    data.extend_from_slice(&1u32.to_ne_bytes());

    let (head, packets) = demo_pcap::read(&data[..]).unwrap();
    assert_eq!(head.magic, 0xa1b2_c3d4);
    assert_eq!(packets.len(), 0);
}
