use viewio::*;
use test_harness::TestHarness;

#[test]
fn table_driven_chunked_cycles() {
    // Purpose: Write random payloads through a buffered writer in chunks of varying
    // sizes (below, at and above capacity) and read them back with the same chunking.
    // Ensures the file holds exactly the concatenation of the chunks.
    let mut h = TestHarness::new();
    let cases: &[(&str, usize, Vec<usize>)] = &[
        ("empty", 16, vec![]),
        ("one", 16, vec![8]),
        ("few", 16, vec![4, 16, 32]),
        ("many_small", 16, vec![3; 100]),
        ("oversized", 16, vec![1, 100, 2, 300, 5]),
        ("default_capacity", DEFAULT_CAPACITY, vec![4000, 200, 9000]),
    ];

    for (name, capacity, sizes) in cases.iter() {
        let chunks: Vec<Vec<u8>> = sizes.iter().map(|&n| h.gen_bytes(n)).collect();
        {
            let mut w = h.writer(*capacity);
            for c in &chunks {
                w.write_bytes(c).unwrap();
            }
            w.flush().unwrap();
        }

        assert_eq!(h.contents(), chunks.concat(), "case {name}");

        let mut r = h.reader(*capacity);
        for c in &chunks {
            assert_eq!(r.read_slice(c.len()).unwrap(), &c[..], "case {name}");
        }
        assert_eq!(r.offset() as usize, chunks.iter().map(Vec::len).sum::<usize>());
    }
}

#[test]
fn typed_record_cycle() {
    // Purpose: A fixed record of every primitive, repeated enough times to force
    // several window refills, decodes to exactly what was encoded.
    let h = TestHarness::new();
    let count = 200i64;
    {
        let mut w = h.writer(64);
        for i in 0..count {
            w.write_u8(i as u8).unwrap();
            w.write_i8((i as i8).wrapping_neg()).unwrap();
            w.write_u16(i as u16 * 3).unwrap();
            w.write_i16(-(i as i16)).unwrap();
            w.write_u32(i as u32 * 1000).unwrap();
            w.write_i32(-(i as i32) * 1000).unwrap();
            w.write_u64(i as u64 * 1_000_000_007).unwrap();
            w.write_i64(-i * 1_000_000_007).unwrap();
            w.write_f32(i as f32 * 0.5).unwrap();
            w.write_f64(i as f64 * 0.25).unwrap();
            w.write_bool(i % 2 == 0).unwrap();
            w.write_str("rec").unwrap();
        }
        w.flush().unwrap();
    }

    let mut r = h.reader(64);
    for i in 0..count {
        assert_eq!(r.read_u8().unwrap(), i as u8);
        assert_eq!(r.read_i8().unwrap(), (i as i8).wrapping_neg());
        assert_eq!(r.read_u16().unwrap(), i as u16 * 3);
        assert_eq!(r.read_i16().unwrap(), -(i as i16));
        assert_eq!(r.read_u32().unwrap(), i as u32 * 1000);
        assert_eq!(r.read_i32().unwrap(), -(i as i32) * 1000);
        assert_eq!(r.read_u64().unwrap(), i as u64 * 1_000_000_007);
        assert_eq!(r.read_i64().unwrap(), -i * 1_000_000_007);
        assert_eq!(r.read_f32().unwrap(), i as f32 * 0.5);
        assert_eq!(r.read_f64().unwrap(), i as f64 * 0.25);
        assert_eq!(r.read_bool().unwrap(), i % 2 == 0);
        assert_eq!(r.read_string(3).unwrap(), "rec");
    }
    assert!(matches!(
        r.read_u8(),
        Err(Error::UnexpectedEof { wanted: 1, got: 0, .. })
    ));
}

#[test]
fn patch_header_after_body() {
    // Purpose: The classic "reserve a length slot, write the body, seek back and
    // patch it" pattern works through the buffered writer's seek-flush path.
    let h = TestHarness::new();
    {
        let mut w = h.writer(16);
        w.write_u32(0).unwrap();
        let body_start = w.offset();
        for i in 0..50u16 {
            w.write_u16(i).unwrap();
        }
        let body_len = (w.offset() - body_start) as u32;
        w.seek(SeekFrom::Start(0)).unwrap();
        w.write_u32(body_len).unwrap();
        w.seek(SeekFrom::End(0)).unwrap();
        w.write_u8(0xff).unwrap();
        w.flush().unwrap();
    }

    let mut r = h.reader(16);
    let len = r.read_u32().unwrap();
    assert_eq!(len, 100);
    for i in 0..50u16 {
        assert_eq!(r.read_u16().unwrap(), i);
    }
    assert_eq!(r.read_u8().unwrap(), 0xff);
    assert_eq!(r.offset(), 105);
}

#[test]
fn random_access_matches_file_contents() {
    // Purpose: Random seeks followed by random-length reads always return the
    // bytes at that position of the file, wherever the window currently sits.
    let mut h = TestHarness::new();
    let data = h.fill(5000);
    let starts = h.gen_sizes(200, data.len() - 1);
    let lens = h.gen_sizes(200, 300);

    let mut r = h.reader(128);
    for (&start, &len) in starts.iter().zip(&lens) {
        let len = len.min(data.len() - start);
        r.seek(SeekFrom::Start(start as i64)).unwrap();
        assert_eq!(r.read_slice(len).unwrap(), &data[start..start + len]);
        assert_eq!(r.offset() as usize, start + len);
    }
}
