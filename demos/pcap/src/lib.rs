//! Reads the classic libpcap file format, using `arrex`-registered structs
//! for the two fixed-size headers and a `TypedList<u8>` for each packet's
//! payload — a small demonstration of mixing host-defined dtypes with the
//! built-in byte dtype in one reader.

use std::io::{self, Read};

use arrex::buffer::RawBuffer;
use arrex::list::TypedList;
use arrex::registry::DtypeKey;
use arrex::Element;

#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, arrex_derive::Dtype)]
#[repr(C)]
#[arrex(layout = "IHHiIII")]
pub struct Header {
    pub magic: u32,
    pub version_major: u16,
    pub version_minor: u16,
    pub ts_correction: i32,
    pub ts_accuracy: u32,
    pub snaplen: u32,
    pub datalink: u32,
}

#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, arrex_derive::Dtype)]
#[repr(C)]
#[arrex(layout = "IIII")]
struct PacketHeader {
    ts_sec: u32,
    ts_usec: u32,
    incl_len: u32,
    orig_len: u32,
}

const MAGIC: u32 = 0xa1b2_c3d4;

#[derive(Debug)]
pub struct Packet {
    pub ts_sec: u32,
    pub ts_usec: u32,
    pub orig_len: u32,
    pub data: TypedList,
}

impl Header {
    fn read_from<R: Read>(inp: &mut R) -> io::Result<Self> {
        let codec = Header::register().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut buf = vec![0u8; codec.size()];
        inp.read_exact(&mut buf)?;
        let value = codec
            .unpack(&buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let header = Header::from_value(&value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if header.magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "not a pcap capture (bad magic)",
            ));
        }
        Ok(header)
    }
}

impl Packet {
    fn read_from<R: Read>(
        inp: &mut R,
        header_codec: &arrex::Codec,
        byte_codec: &arrex::Codec,
    ) -> io::Result<Self> {
        let mut buf = vec![0u8; header_codec.size()];
        inp.read_exact(&mut buf)?;
        let value = header_codec
            .unpack(&buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let header = PacketHeader::from_value(&value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut payload = vec![0u8; header.incl_len as usize];
        inp.read_exact(&mut payload)?;
        let data = TypedList::from_buffer(RawBuffer::from_vec(payload), byte_codec.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok(Packet {
            ts_sec: header.ts_sec,
            ts_usec: header.ts_usec,
            orig_len: header.orig_len,
            data,
        })
    }
}

/// Reads a whole capture into memory: the global header plus every
/// packet, stopping at the first short read (end of file).
pub fn read<R: Read>(mut inp: R) -> io::Result<(Header, Vec<Packet>)> {
    arrex::numbers::install();
    let head = Header::read_from(&mut inp)?;
    let header_codec =
        PacketHeader::register().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let byte_codec = arrex::registry::declared(&DtypeKey::Layout("B".into()))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let mut packets = Vec::new();
    loop {
        match Packet::read_from(&mut inp, &header_codec, &byte_codec) {
            Ok(packet) => packets.push(packet),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        }
    }
    Ok((head, packets))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_capture(packet_count: usize) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC.to_ne_bytes());
        buf.extend_from_slice(&2u16.to_ne_bytes());
        buf.extend_from_slice(&4u16.to_ne_bytes());
        buf.extend_from_slice(&0i32.to_ne_bytes());
        buf.extend_from_slice(&0u32.to_ne_bytes());
        buf.extend_from_slice(&65535u32.to_ne_bytes());
        buf.extend_from_slice(&1u32.to_ne_bytes());

        for i in 0..packet_count {
            let payload = vec![i as u8; 4];
            buf.extend_from_slice(&(i as u32).to_ne_bytes());
            buf.extend_from_slice(&0u32.to_ne_bytes());
            buf.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
            buf.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
            buf.extend_from_slice(&payload);
        }
        buf
    }

    #[test]
    fn reads_header_and_packets() {
        let data = synthetic_capture(3);
        let (head, packets) = read(&data[..]).unwrap();
        assert_eq!(head.magic, MAGIC);
        assert_eq!(packets.len(), 3);
        assert_eq!(packets[2].data.len(), 4);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = synthetic_capture(1);
        data[0] = 0;
        assert!(read(&data[..]).is_err());
    }
}
