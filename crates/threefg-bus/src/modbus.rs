//! 真实设备适配器
//!
//! [`ModbusGripper`] 把 [`GripperBus`] 原语委托给一个外部 Modbus 客户端。
//! 线路层帧的编解码和串口/TCP 连接管理不在本 crate 范围内，
//! 由实现 [`RegisterTransport`] 的传输层提供。

use crate::{BusDeviceError, BusError, GripperBus};
use tracing::{debug, info, warn};

/// 3FG15 出厂默认的 Modbus 从站地址
pub const DEFAULT_SLAVE_ADDR: u8 = 65;

/// RTU 模式默认波特率（1 Mbaud, 8E1）
pub const DEFAULT_RTU_BAUD_RATE: u32 = 1_000_000;

/// 物理连接端点描述
///
/// 纯配置数据；实际的串口/套接字由传输层根据它建立。
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModbusEndpoint {
    /// RS485 串口（Modbus RTU）
    Rtu {
        /// 串口设备路径（如 "/dev/ttyUSB0"）
        serial_port: String,
        /// 波特率
        baud_rate: u32,
    },
    /// 以太网（Modbus TCP）
    Tcp {
        /// 设备 IP
        host: String,
        /// TCP 端口
        port: u16,
    },
}

impl ModbusEndpoint {
    /// RTU 端点，使用默认波特率
    pub fn rtu(serial_port: impl Into<String>) -> Self {
        Self::Rtu {
            serial_port: serial_port.into(),
            baud_rate: DEFAULT_RTU_BAUD_RATE,
        }
    }

    /// TCP 端点，使用标准 Modbus 端口 502
    pub fn tcp(host: impl Into<String>) -> Self {
        Self::Tcp {
            host: host.into(),
            port: 502,
        }
    }
}

/// 外部 Modbus 客户端必须提供的传输原语
///
/// 这是被排除在核心之外的线路层的接口契约。错误以结构化的
/// [`BusDeviceError`] 返回，由适配器映射为 [`BusError`]。
pub trait RegisterTransport {
    /// 建立物理连接；被拒绝时返回 false
    fn connect(&mut self) -> bool;

    /// 关闭物理连接
    fn close(&mut self);

    /// 读取保持寄存器
    fn read_holding_registers(
        &mut self,
        address: u16,
        count: u16,
        unit: u8,
    ) -> Result<Vec<u16>, BusDeviceError>;

    /// 写入单个寄存器
    fn write_single_register(
        &mut self,
        address: u16,
        value: u16,
        unit: u8,
    ) -> Result<(), BusDeviceError>;

    /// 写入连续寄存器块
    fn write_multiple_registers(
        &mut self,
        address: u16,
        values: &[u16],
        unit: u8,
    ) -> Result<(), BusDeviceError>;
}

/// 真实 3FG15 设备适配器
///
/// 把寄存器读写委托给传输层，并附带从站地址。与
/// [`SimulatedGripper`](https://docs.rs/threefg-sim) 在 [`GripperBus`]
/// 之后可互换。
pub struct ModbusGripper<T: RegisterTransport> {
    transport: T,
    endpoint: ModbusEndpoint,
    slave_addr: u8,
    connected: bool,
}

impl<T: RegisterTransport> ModbusGripper<T> {
    /// 创建适配器，使用出厂默认从站地址 65
    pub fn new(transport: T, endpoint: ModbusEndpoint) -> Self {
        Self::with_slave_addr(transport, endpoint, DEFAULT_SLAVE_ADDR)
    }

    /// 创建适配器并指定从站地址
    pub fn with_slave_addr(transport: T, endpoint: ModbusEndpoint, slave_addr: u8) -> Self {
        Self {
            transport,
            endpoint,
            slave_addr,
            connected: false,
        }
    }

    /// 连接端点描述
    pub fn endpoint(&self) -> &ModbusEndpoint {
        &self.endpoint
    }

    /// 配置的从站地址
    pub fn slave_addr(&self) -> u8 {
        self.slave_addr
    }

    /// 当前是否已连接
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl<T: RegisterTransport> GripperBus for ModbusGripper<T> {
    fn open_connection(&mut self) -> bool {
        if self.connected {
            return true;
        }
        self.connected = self.transport.connect();
        if self.connected {
            info!(endpoint = ?self.endpoint, slave_addr = self.slave_addr, "gripper connected");
        } else {
            warn!(endpoint = ?self.endpoint, "gripper connection refused");
        }
        self.connected
    }

    fn close_connection(&mut self) {
        if self.connected {
            self.transport.close();
            self.connected = false;
            debug!("gripper connection closed");
        }
    }

    fn write_register(&mut self, reg: u16, value: u16) -> Result<(), BusError> {
        if !self.connected {
            return Err(BusError::NotConnected);
        }
        self.transport
            .write_single_register(reg, value, self.slave_addr)
            .map_err(BusError::Device)
    }

    fn write_registers(&mut self, start_reg: u16, values: &[u16]) -> Result<(), BusError> {
        if !self.connected {
            return Err(BusError::NotConnected);
        }
        self.transport
            .write_multiple_registers(start_reg, values, self.slave_addr)
            .map_err(BusError::Device)
    }

    fn read_registers(&mut self, reg: u16, count: u16) -> Result<Vec<u16>, BusError> {
        if !self.connected {
            return Err(BusError::NotConnected);
        }
        self.transport
            .read_holding_registers(reg, count, self.slave_addr)
            .map_err(BusError::Device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BusDeviceErrorKind, GripperCommands};
    use std::collections::HashMap;
    use threefg_protocol::{REG_MAX_DIAMETER, REG_MIN_DIAMETER, REG_TARGET_FORCE};

    /// Mock 传输层：寄存器表 + 调用记录
    struct MockTransport {
        registers: HashMap<u16, u16>,
        writes: Vec<(u16, u16, u8)>,
        accept_connection: bool,
        closed: bool,
    }

    impl MockTransport {
        fn new() -> Self {
            let mut registers = HashMap::new();
            registers.insert(REG_MIN_DIAMETER, 0);
            registers.insert(REG_MAX_DIAMETER, 1000);
            Self {
                registers,
                writes: Vec::new(),
                accept_connection: true,
                closed: false,
            }
        }
    }

    impl RegisterTransport for MockTransport {
        fn connect(&mut self) -> bool {
            self.accept_connection
        }

        fn close(&mut self) {
            self.closed = true;
        }

        fn read_holding_registers(
            &mut self,
            address: u16,
            count: u16,
            _unit: u8,
        ) -> Result<Vec<u16>, BusDeviceError> {
            Ok((0..count)
                .map(|i| self.registers.get(&(address + i)).copied().unwrap_or(0))
                .collect())
        }

        fn write_single_register(
            &mut self,
            address: u16,
            value: u16,
            unit: u8,
        ) -> Result<(), BusDeviceError> {
            self.registers.insert(address, value);
            self.writes.push((address, value, unit));
            Ok(())
        }

        fn write_multiple_registers(
            &mut self,
            address: u16,
            values: &[u16],
            unit: u8,
        ) -> Result<(), BusDeviceError> {
            for (i, value) in values.iter().enumerate() {
                self.write_single_register(address + i as u16, *value, unit)?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_open_connection_idempotent() {
        let mut gripper = ModbusGripper::new(MockTransport::new(), ModbusEndpoint::rtu("/dev/ttyUSB0"));
        assert!(gripper.open_connection());
        assert!(gripper.open_connection());
        assert!(gripper.is_connected());
    }

    #[test]
    fn test_refused_connection_returns_false() {
        let mut transport = MockTransport::new();
        transport.accept_connection = false;
        let mut gripper = ModbusGripper::new(transport, ModbusEndpoint::tcp("192.168.1.1"));
        assert!(!gripper.open_connection());
        assert!(!gripper.is_connected());
    }

    #[test]
    fn test_close_when_not_connected_is_safe() {
        let mut gripper = ModbusGripper::new(MockTransport::new(), ModbusEndpoint::rtu("/dev/ttyUSB0"));
        gripper.close_connection();
        assert!(!gripper.is_connected());
    }

    #[test]
    fn test_writes_carry_slave_addr() {
        let mut gripper = ModbusGripper::new(MockTransport::new(), ModbusEndpoint::rtu("/dev/ttyUSB0"));
        gripper.open_connection();
        gripper.write_register(REG_TARGET_FORCE, 500).unwrap();
        assert_eq!(gripper.transport.writes, vec![(REG_TARGET_FORCE, 500, 65)]);
    }

    #[test]
    fn test_not_connected_errors() {
        let mut gripper = ModbusGripper::new(MockTransport::new(), ModbusEndpoint::rtu("/dev/ttyUSB0"));
        assert!(matches!(
            gripper.write_register(0, 1),
            Err(BusError::NotConnected)
        ));
        assert!(matches!(
            gripper.read_registers(0, 1),
            Err(BusError::NotConnected)
        ));
    }

    #[test]
    fn test_block_write_sequential_order() {
        let mut gripper = ModbusGripper::new(MockTransport::new(), ModbusEndpoint::rtu("/dev/ttyUSB0"));
        gripper.open_connection();
        gripper.write_registers(0, &[600, 400, 1]).unwrap();
        let addresses: Vec<u16> = gripper.transport.writes.iter().map(|w| w.0).collect();
        assert_eq!(addresses, vec![0, 1, 2]);
    }

    #[test]
    fn test_high_level_commands_work_through_adapter() {
        let mut gripper = ModbusGripper::new(MockTransport::new(), ModbusEndpoint::rtu("/dev/ttyUSB0"));
        gripper.open_connection();
        gripper.open_gripper(500);
        // 读取 REG_MAX_DIAMETER 后写入 4 个寄存器
        assert_eq!(gripper.transport.writes.len(), 4);
        assert_eq!(gripper.transport.writes[1].1, 1000); // 目标直径 = 最大直径
    }

    #[test]
    fn test_custom_slave_addr() {
        let mut gripper = ModbusGripper::with_slave_addr(
            MockTransport::new(),
            ModbusEndpoint::tcp("10.0.0.5"),
            17,
        );
        gripper.open_connection();
        gripper.write_register(3, 1).unwrap();
        assert_eq!(gripper.transport.writes[0].2, 17);
    }

    #[test]
    fn test_endpoint_constructors() {
        assert_eq!(
            ModbusEndpoint::rtu("/dev/ttyUSB0"),
            ModbusEndpoint::Rtu {
                serial_port: "/dev/ttyUSB0".to_string(),
                baud_rate: 1_000_000,
            }
        );
        assert_eq!(
            ModbusEndpoint::tcp("192.168.1.1"),
            ModbusEndpoint::Tcp {
                host: "192.168.1.1".to_string(),
                port: 502,
            }
        );
    }
}
