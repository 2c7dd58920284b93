use handvol_infer::Device;

#[test]
fn test_parse_devices() {
    assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
    assert_eq!("CUDA".parse::<Device>().unwrap(), Device::Cuda { device_id: 0 });
    assert_eq!("cuda:1".parse::<Device>().unwrap(), Device::Cuda { device_id: 1 });
}

#[test]
fn test_parse_rejects_unknown() {
    assert!("tpu".parse::<Device>().is_err());
    assert!("cuda:x".parse::<Device>().is_err());
}

#[test]
fn test_display() {
    assert_eq!(Device::Cpu.to_string(), "CPU");
    assert_eq!(Device::Cuda { device_id: 2 }.to_string(), "CUDA(device_id=2)");
}
